// src/services/document_service.rs

use std::path::PathBuf;

use chrono::{Datelike, NaiveDate};
use genpdf::{elements, style, Alignment, Element};
use image::Luma;
use qrcode::QrCode;

use crate::{
    common::{
        error::AppError,
        text::{non_blank, truncate_chars},
    },
    models::leave_request::{LeaveRequest, RequestStatus},
};

pub const OBJECTIVE_CAP: usize = 300;
pub const FIELD_CAP: usize = 100;

const BLANK: &str = "---";
const NO_DATES: &str = "Datas não definidas";
const SIGNATURE_LINE: &str = "__________________________";

// Cabeçalho oficial (vem da configuração)
#[derive(Debug, Clone)]
pub struct Letterhead {
    pub issuer: String,
    pub department: String,
}

// Dono da solicitação, já resolvido a partir do usuário + perfil
#[derive(Debug, Clone)]
pub struct RequesterInfo {
    pub name: String,
    pub job_title: Option<String>,
    pub unit: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignatureBox {
    pub title: &'static str,
    pub signer: Option<String>,
    pub caption: String,
}

impl SignatureBox {
    pub fn lines(&self) -> Vec<String> {
        match &self.signer {
            Some(name) => vec![
                name.clone(),
                "Assinado Digitalmente".to_string(),
                self.caption.clone(),
            ],
            None => vec![SIGNATURE_LINE.to_string(), "Assinatura Manual".to_string()],
        }
    }
}

/// O conteúdo do requerimento, já decidido. Desenhar é só layout.
#[derive(Debug, Clone)]
pub struct RequestDocument {
    pub request_id: i64,
    pub letterhead: Letterhead,
    pub protocol: String,
    pub sigm_protocol: Option<String>,
    pub status_line: String,
    pub servant: Vec<(&'static str, String)>,
    pub event: Vec<(&'static str, String)>,
    pub request_types: String,
    pub objective: String,
    pub signatures: [SignatureBox; 4],
}

fn field(value: &str) -> String {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        BLANK.to_string()
    } else {
        truncate_chars(trimmed, FIELD_CAP)
    }
}

fn period(start: Option<NaiveDate>, end: Option<NaiveDate>) -> String {
    match (start, end) {
        (Some(d1), Some(d2)) => format!("{} a {}", d1.format("%d/%m/%Y"), d2.format("%d/%m/%Y")),
        _ => NO_DATES.to_string(),
    }
}

fn checkbox(checked: bool, label: &str) -> String {
    format!("[{}] {}", if checked { "X" } else { " " }, label)
}

impl RequestDocument {
    pub fn build(request: &LeaveRequest, requester: &RequesterInfo, letterhead: &Letterhead) -> Self {
        let status = request.status;
        let year = request
            .start_date
            .map(|d| d.year())
            .unwrap_or_else(|| request.submitted_at.year());

        let requester_name = field(&requester.name);
        let job_title = field(non_blank(requester.job_title.as_deref()).unwrap_or(request.job_title.as_str()));
        let unit = field(non_blank(requester.unit.as_deref()).unwrap_or(request.unit.as_str()));

        let location = if request.city.trim().is_empty() {
            BLANK.to_string()
        } else {
            field(&format!("{}/{}", request.city.trim(), request.state.trim()))
        };

        let status_line = match status {
            RequestStatus::Approved => "DEFERIDO E FINALIZADO".to_string(),
            RequestStatus::Rejected => format!(
                "INDEFERIDO: {}",
                field(request.cancellation_reason.as_deref().unwrap_or(BLANK))
            ),
            other => format!("STATUS ATUAL: {}", other.label()),
        };

        let objective = match non_blank(Some(request.objective.as_str())) {
            Some(text) => truncate_chars(text, OBJECTIVE_CAP),
            None => BLANK.to_string(),
        };

        // Etapa vencida sem nome gravado: mostra que passou pelo sistema
        let stage_signer = |stored: Option<&String>, passed: bool, fallback: &str| {
            match non_blank(stored.map(String::as_str)) {
                Some(name) => Some(field(name)),
                None if passed => Some(fallback.to_string()),
                None => None,
            }
        };

        let manager_passed = matches!(
            status,
            RequestStatus::PendingCoordinator | RequestStatus::PendingAdmin | RequestStatus::Approved
        );
        let coordinator_passed = matches!(status, RequestStatus::PendingAdmin | RequestStatus::Approved);
        let admin_passed = status == RequestStatus::Approved;

        let signatures = [
            SignatureBox {
                title: "SERVIDOR SOLICITANTE",
                signer: Some(requester_name.clone()),
                caption: job_title.clone(),
            },
            SignatureBox {
                title: "CHEFIA IMEDIATA",
                signer: stage_signer(request.manager_signature.as_ref(), manager_passed, "(Aprovado no Sistema)"),
                caption: "Gerente".to_string(),
            },
            SignatureBox {
                title: "COORDENAÇÃO / DIRETORIA",
                signer: stage_signer(
                    request.coordinator_signature.as_ref(),
                    coordinator_passed,
                    "(Autorizado no Sistema)",
                ),
                caption: "Coordenador".to_string(),
            },
            SignatureBox {
                title: "SECRETARIA DE SAÚDE",
                signer: stage_signer(
                    request.admin_signature.as_ref(),
                    admin_passed,
                    "Secretaria Municipal de Saúde",
                ),
                caption: "Autorização Final".to_string(),
            },
        ];

        let request_types = [
            checkbox(request.type_invitation, "Convite"),
            checkbox(request.type_schedule, "Programação"),
            checkbox(request.type_summons, "Convocação"),
            checkbox(request.type_other, "Outros"),
        ]
        .join("   ");

        RequestDocument {
            request_id: request.id,
            letterhead: letterhead.clone(),
            protocol: format!("{}/{}", request.id, year),
            sigm_protocol: non_blank(request.sigm_protocol.as_deref()).map(field),
            status_line,
            servant: vec![
                ("Nome", requester_name),
                ("Matrícula", field(&request.registration_number)),
                ("Cargo", job_title),
                ("Unidade", unit),
            ],
            event: vec![
                ("Evento", field(&request.event_name)),
                ("Período", period(request.start_date, request.end_date)),
                ("Local", location),
            ],
            request_types,
            objective,
            signatures,
        }
    }
}

#[derive(Clone)]
pub struct DocumentService {
    fonts_dir: PathBuf,
    font_family: String,
    letterhead: Letterhead,
}

impl DocumentService {
    pub fn new(fonts_dir: PathBuf, font_family: String, letterhead: Letterhead) -> Self {
        Self { fonts_dir, font_family, letterhead }
    }

    pub fn letterhead(&self) -> &Letterhead {
        &self.letterhead
    }

    /// Gera o PDF numa thread de bloqueio (genpdf é síncrono).
    pub async fn render(&self, document: RequestDocument) -> Result<Vec<u8>, AppError> {
        let service = self.clone();
        tokio::task::spawn_blocking(move || service.render_blocking(&document))
            .await
            .map_err(|e| anyhow::anyhow!("Falha na task de geração do PDF: {}", e))?
    }

    fn render_blocking(&self, document: &RequestDocument) -> Result<Vec<u8>, AppError> {
        // Carrega a fonte da pasta configurada
        let font_family = genpdf::fonts::from_files(&self.fonts_dir, &self.font_family, None).map_err(|_| {
            AppError::FontNotFound(format!(
                "Fonte '{}' não encontrada em {}",
                self.font_family,
                self.fonts_dir.display()
            ))
        })?;

        let mut doc = genpdf::Document::new(font_family);
        doc.set_title(format!("Dispensa #{}", document.request_id));
        doc.set_font_size(10);
        let mut decorator = genpdf::SimplePageDecorator::new();
        decorator.set_margins(15);
        doc.set_page_decorator(decorator);

        let bold = style::Style::new().bold();

        // --- CABEÇALHO ---
        doc.push(centered(&document.letterhead.issuer).styled(bold.with_font_size(12)));
        doc.push(centered(&document.letterhead.department));
        doc.push(elements::Break::new(1.5));
        doc.push(centered("REQUERIMENTO DE DISPENSA").styled(bold.with_font_size(14)));

        let mut protocol = elements::Paragraph::new(format!("Protocolo Digital Nº: {}", document.protocol));
        protocol.set_alignment(Alignment::Right);
        doc.push(protocol);
        if let Some(sigm) = &document.sigm_protocol {
            let mut p = elements::Paragraph::new(format!("Protocolo SIGM: {}", sigm));
            p.set_alignment(Alignment::Right);
            doc.push(p);
        }
        doc.push(elements::Paragraph::new(document.status_line.clone()).styled(style::Style::new().italic()));
        doc.push(elements::Break::new(1));

        // --- DADOS ---
        push_section(&mut doc, "1. DADOS DO SERVIDOR", &document.servant);
        push_section(&mut doc, "2. DADOS DO AFASTAMENTO", &document.event);
        doc.push(elements::Paragraph::new(format!("Tipo: {}", document.request_types)));
        doc.push(elements::Paragraph::new("Objetivo:").styled(bold));
        doc.push(elements::Paragraph::new(document.objective.clone()).padded(genpdf::Margins::trbl(0, 0, 0, 10)));
        doc.push(elements::Break::new(2));

        // --- 4 ÁREAS DE ASSINATURA ---
        doc.push(elements::Paragraph::new("3. APROVAÇÕES").styled(bold));
        let mut table = elements::TableLayout::new(vec![1, 1]);
        table.set_cell_decorator(elements::FrameCellDecorator::new(true, true, false));
        for pair in document.signatures.chunks(2) {
            let mut row = table.row();
            for sig in pair {
                row.push_element(signature_cell(sig));
            }
            row.push()
                .map_err(|e| anyhow::anyhow!("Erro na tabela de assinaturas: {}", e))?;
        }
        doc.push(table);
        doc.push(elements::Break::new(1.5));

        // --- QR CODE DO PROTOCOLO (melhor esforço) ---
        match protocol_qr(&document.protocol) {
            Ok(image) => doc.push(image),
            Err(e) => tracing::warn!("QR Code do protocolo {} ignorado: {}", document.protocol, e),
        }

        // --- RODAPÉ ---
        doc.push(elements::Break::new(1));
        doc.push(
            centered("Documento gerado eletronicamente pelo Sistema Dispensa Digital.")
                .styled(style::Style::new().italic().with_font_size(8)),
        );

        // Renderiza para Buffer (Memória)
        let mut buffer = Vec::new();
        doc.render(&mut buffer)
            .map_err(|e| anyhow::anyhow!("Falha ao renderizar o PDF: {}", e))?;

        Ok(buffer)
    }
}

fn centered(text: &str) -> elements::Paragraph {
    let mut p = elements::Paragraph::new(text.to_string());
    p.set_alignment(Alignment::Center);
    p
}

fn push_section(doc: &mut genpdf::Document, title: &str, rows: &[(&'static str, String)]) {
    doc.push(elements::Paragraph::new(title.to_string()).styled(style::Style::new().bold()));
    for (label, value) in rows {
        doc.push(elements::Paragraph::new(format!("{}: {}", label, value)));
    }
    doc.push(elements::Break::new(1));
}

fn signature_cell(sig: &SignatureBox) -> impl Element + use<> {
    let mut layout = elements::LinearLayout::vertical();
    layout.push(elements::Paragraph::new(sig.title).styled(style::Style::new().bold().with_font_size(7)));
    layout.push(elements::Break::new(1));
    for (i, line) in sig.lines().into_iter().enumerate() {
        let size = if i == 0 { 9 } else { 7 };
        layout.push(centered(&line).styled(style::Style::new().with_font_size(size)));
    }
    layout.padded(2)
}

fn protocol_qr(protocol: &str) -> anyhow::Result<elements::Image> {
    let code = QrCode::new(format!("dispensa:{}", protocol).as_bytes())
        .map_err(|e| anyhow::anyhow!(e.to_string()))?;
    let image_buffer = code.render::<Luma<u8>>().build();
    let dynamic_image = image::DynamicImage::ImageLuma8(image_buffer);

    let image = elements::Image::from_dynamic_image(dynamic_image)
        .map_err(|e| anyhow::anyhow!(e.to_string()))?
        .with_alignment(Alignment::Center)
        .with_scale(genpdf::Scale::new(0.3, 0.3));
    Ok(image)
}
