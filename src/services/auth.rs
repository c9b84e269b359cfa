// src/services/auth.rs

use bcrypt::{hash, verify};
use chrono::Utc;
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    common::{
        error::AppError,
        text::{mask_email, non_blank},
    },
    db::{ProfileRepository, UserRepository},
    models::{
        auth::{
            AuthResponse, ChangePasswordPayload, Claims, PasswordResetConfirmPayload,
            PasswordResetRequested, RegisterUserPayload, ResetClaims, Role, SessionUser, User,
        },
        profile::UserProfile,
    },
    services::identity::IdentityService,
};

const RESET_PURPOSE: &str = "password_reset";
const GENERIC_MASK: &str = "******@****.com";

// Pedaço do hash atual que vai dentro do código de recuperação
fn fingerprint(password_hash: &str) -> String {
    let chars: Vec<char> = password_hash.chars().collect();
    chars[chars.len().saturating_sub(16)..].iter().collect()
}

async fn hash_password(password: &str) -> Result<String, AppError> {
    let password = password.to_owned();
    let hashed = tokio::task::spawn_blocking(move || hash(&password, bcrypt::DEFAULT_COST))
        .await
        .map_err(|e| anyhow::anyhow!("Falha na task de hashing: {}", e))??;
    Ok(hashed)
}

async fn verify_password(password: &str, password_hash: &str) -> Result<bool, AppError> {
    let password = password.to_owned();
    let password_hash = password_hash.to_owned();
    let valid = tokio::task::spawn_blocking(move || verify(&password, &password_hash))
        .await
        .map_err(|e| anyhow::anyhow!("Falha na task de verificação de senha: {}", e))??;
    Ok(valid)
}

fn session_user(user: &User, role: Role, profile: &UserProfile) -> SessionUser {
    SessionUser {
        id: user.id,
        name: user.display_name().to_string(),
        username: user.username.clone(),
        role,
        job_title: profile.job_title.clone(),
        unit: profile.unit.clone(),
    }
}

#[derive(Clone)]
pub struct AuthService {
    user_repo: UserRepository,
    profile_repo: ProfileRepository,
    identity_service: IdentityService,
    jwt_secret: String,
    pool: PgPool,
}

impl AuthService {
    pub fn new(
        user_repo: UserRepository,
        profile_repo: ProfileRepository,
        identity_service: IdentityService,
        jwt_secret: String,
        pool: PgPool,
    ) -> Self {
        Self { user_repo, profile_repo, identity_service, jwt_secret, pool }
    }

    pub async fn register_user(&self, payload: &RegisterUserPayload) -> Result<AuthResponse, AppError> {
        // 1. Hashing (fora da transação, não toca no banco)
        let hashed_password = hash_password(&payload.password).await?;

        // 2. Usuário + perfil: ou os dois, ou nenhum
        let mut tx = self.pool.begin().await?;

        let user = self
            .user_repo
            .create_user(
                &mut *tx,
                payload.username.trim(),
                payload.first_name.trim(),
                non_blank(payload.email.as_deref()).unwrap_or(""),
                &hashed_password,
            )
            .await?;

        let profile = self
            .profile_repo
            .upsert(
                &mut *tx,
                user.id,
                non_blank(payload.job_title.as_deref()),
                non_blank(payload.unit.as_deref()),
            )
            .await?;

        tx.commit().await?;

        tracing::info!("👤 Servidor {} cadastrado.", user.username);

        // Conta nova ainda não está em nenhum grupo
        let token = self.create_token(user.id)?;
        Ok(AuthResponse {
            token,
            user: session_user(&user, Role::User, &profile),
        })
    }

    pub async fn login_user(&self, username: &str, password: &str) -> Result<AuthResponse, AppError> {
        let user = self
            .user_repo
            .find_by_username(username.trim())
            .await?
            .ok_or(AppError::InvalidCredentials)?;

        if !verify_password(password, &user.password_hash).await? {
            return Err(AppError::InvalidCredentials);
        }

        let token = self.create_token(user.id)?;
        let profile = self.profile_repo.get_or_create(user.id).await?;
        let identity = self.identity_service.resolve(user).await?;

        Ok(AuthResponse {
            token,
            user: session_user(&identity.user, identity.role, &profile),
        })
    }

    pub async fn validate_token(&self, token: &str) -> Result<User, AppError> {
        let token_data = decode::<Claims>(
            token,
            &DecodingKey::from_secret(self.jwt_secret.as_ref()),
            &Validation::default(),
        )
        .map_err(|_| AppError::InvalidToken)?;

        self.user_repo
            .find_by_id(token_data.claims.sub)
            .await?
            .ok_or(AppError::UserNotFound)
    }

    pub async fn change_password(&self, user: &User, payload: &ChangePasswordPayload) -> Result<(), AppError> {
        if payload.new_password != payload.confirm_password {
            return Err(AppError::InvalidInput("As novas senhas não conferem."));
        }

        if !verify_password(&payload.old_password, &user.password_hash).await? {
            return Err(AppError::InvalidInput("A senha atual está incorreta."));
        }

        let hashed = hash_password(&payload.new_password).await?;
        self.user_repo.update_password(user.id, &hashed).await?;

        tracing::info!("🔑 Senha alterada por {}.", user.username);
        Ok(())
    }

    pub async fn request_password_reset(&self, username: &str) -> Result<PasswordResetRequested, AppError> {
        // Resposta igual para matrícula inexistente: não revelamos quem existe
        let Some(user) = self.user_repo.find_by_username(username.trim()).await? else {
            return Ok(PasswordResetRequested {
                message: "Se a matrícula existir, um código foi enviado.".to_string(),
                masked_email: GENERIC_MASK.to_string(),
                uid: None,
            });
        };

        let code = self.create_reset_token(&user)?;

        // Sem envio de e-mail: o código vai para o log
        tracing::info!("📧 Código de recuperação para {} ({}): {}", user.display_name(), user.username, code);

        Ok(PasswordResetRequested {
            message: "Código enviado!".to_string(),
            masked_email: mask_email(&user.email),
            uid: Some(user.id),
        })
    }

    pub async fn confirm_password_reset(&self, payload: &PasswordResetConfirmPayload) -> Result<(), AppError> {
        let claims = decode::<ResetClaims>(
            &payload.token,
            &DecodingKey::from_secret(self.reset_secret().as_ref()),
            &Validation::default(),
        )
        .map_err(|_| AppError::InvalidResetToken)?
        .claims;

        if claims.sub != payload.uid || claims.purpose != RESET_PURPOSE {
            return Err(AppError::InvalidResetToken);
        }

        let user = self
            .user_repo
            .find_by_id(payload.uid)
            .await?
            .ok_or(AppError::InvalidResetToken)?;

        // Senha já trocada desde a emissão: código usado
        if claims.fp != fingerprint(&user.password_hash) {
            return Err(AppError::InvalidResetToken);
        }

        let hashed = hash_password(&payload.new_password).await?;
        self.user_repo.update_password(user.id, &hashed).await?;

        tracing::info!("🔑 Senha redefinida por código para {}.", user.username);
        Ok(())
    }

    fn create_token(&self, user_id: Uuid) -> Result<String, AppError> {
        let now = Utc::now();
        let expires_at = now + chrono::Duration::days(7);

        let claims = Claims {
            sub: user_id,
            exp: expires_at.timestamp() as usize,
            iat: now.timestamp() as usize,
        };

        Ok(encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(self.jwt_secret.as_ref()),
        )?)
    }

    // Segredo derivado: um código de recuperação nunca vale como token de sessão
    fn reset_secret(&self) -> String {
        format!("{}:{}", self.jwt_secret, RESET_PURPOSE)
    }

    fn create_reset_token(&self, user: &User) -> Result<String, AppError> {
        let now = Utc::now();
        let expires_at = now + chrono::Duration::hours(1);

        let claims = ResetClaims {
            sub: user.id,
            exp: expires_at.timestamp() as usize,
            iat: now.timestamp() as usize,
            purpose: RESET_PURPOSE.to_string(),
            fp: fingerprint(&user.password_hash),
        };

        Ok(encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(self.reset_secret().as_ref()),
        )?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fingerprint_is_hash_tail() {
        let h = "$2b$12$abcdefghijklmnopqrstuvABCDEFGHIJKLMNOPQRSTUVWXYZ01234";
        assert_eq!(fingerprint(h), "PQRSTUVWXYZ01234");
        assert_eq!(fingerprint("curto"), "curto");
    }

    #[tokio::test]
    async fn password_hash_roundtrip() {
        let hashed = hash_password("segredo123").await.unwrap();
        assert!(verify_password("segredo123", &hashed).await.unwrap());
        assert!(!verify_password("outra", &hashed).await.unwrap());
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn register_treats_blank_profile_fields_as_absent(pool: PgPool) {
        use crate::db::OrganizationRepository;

        let user_repo = UserRepository::new(pool.clone());
        let identity_service = IdentityService::new(user_repo.clone(), OrganizationRepository::new(pool.clone()));
        let service = AuthService::new(
            user_repo,
            ProfileRepository::new(pool.clone()),
            identity_service,
            "segredo-de-teste".into(),
            pool.clone(),
        );

        let payload = RegisterUserPayload {
            username: " 102030 ".into(),
            password: "segredo123".into(),
            first_name: "Maria".into(),
            email: None,
            job_title: Some("   ".into()),
            unit: Some("".into()),
        };
        let res = service.register_user(&payload).await.unwrap();

        assert_eq!(res.user.username, "102030");
        assert_eq!(res.user.job_title, "Servidor");
        assert_eq!(res.user.unit, "Não definida");

        let stored = ProfileRepository::new(pool.clone()).find(res.user.id).await.unwrap().unwrap();
        assert_eq!(stored.job_title, "Servidor");
        assert_eq!(stored.unit, "Não definida");
    }
}
