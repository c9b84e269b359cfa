// src/common/text.rs

/// Nome exibido numa assinatura: o primeiro nome, ou a matrícula se estiver em branco.
pub fn display_name<'a>(first_name: &'a str, username: &'a str) -> &'a str {
    let trimmed = first_name.trim();
    if trimmed.is_empty() { username } else { trimmed }
}

/// Campo opcional: sem espaços nas pontas, e vazio conta como ausente.
pub fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|s| !s.is_empty())
}

/// Corta o texto em `max` caracteres (não bytes, por causa dos acentos).
pub fn truncate_chars(text: &str, max: usize) -> String {
    match text.char_indices().nth(max) {
        Some((idx, _)) => text[..idx].to_string(),
        None => text.to_string(),
    }
}

/// "gabriel@gmail.com" -> "ga*****@gmail.com"
pub fn mask_email(email: &str) -> String {
    let email = email.trim();
    if email.is_empty() {
        return "email***@naocadastrado.com".to_string();
    }

    match email.split_once('@') {
        Some((user, domain)) if !user.is_empty() && !domain.is_empty() => {
            let visible: String = user.chars().take(2).collect();
            let hidden = user.chars().count().saturating_sub(2);
            format!("{}{}@{}", visible, "*".repeat(hidden), domain)
        }
        // E-mail fora do formato: devolve como está
        _ => email.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_name_falls_back_to_username() {
        assert_eq!(display_name("Maria", "12345"), "Maria");
        assert_eq!(display_name("", "12345"), "12345");
        assert_eq!(display_name("   ", "12345"), "12345");
    }

    #[test]
    fn blank_optional_values_are_absent() {
        assert_eq!(non_blank(None), None);
        assert_eq!(non_blank(Some("")), None);
        assert_eq!(non_blank(Some("   ")), None);
        assert_eq!(non_blank(Some(" UBS Central ")), Some("UBS Central"));
    }

    #[test]
    fn truncate_counts_chars_not_bytes() {
        assert_eq!(truncate_chars("São José", 3), "São");
        assert_eq!(truncate_chars("curto", 300), "curto");
    }

    #[test]
    fn masks_local_part() {
        assert_eq!(mask_email("gabriel@gmail.com"), "ga*****@gmail.com");
        assert_eq!(mask_email("ab@x.com"), "ab@x.com");
        assert_eq!(mask_email("a@x.com"), "a@x.com");
        assert_eq!(mask_email(""), "email***@naocadastrado.com");
        assert_eq!(mask_email("sem-arroba"), "sem-arroba");
    }
}
