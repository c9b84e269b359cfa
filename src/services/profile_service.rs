// src/services/profile_service.rs

use sqlx::PgPool;

use crate::{
    common::{error::AppError, text::non_blank},
    db::{ProfileRepository, UserRepository},
    models::{
        auth::User,
        profile::{MyData, UpdateProfilePayload, UserProfile},
    },
};

fn my_data(user: &User, profile: UserProfile) -> MyData {
    MyData {
        name: user.display_name().to_string(),
        email: user.email.clone(),
        username: user.username.clone(),
        job_title: profile.job_title,
        unit: profile.unit,
    }
}

#[derive(Clone)]
pub struct ProfileService {
    user_repo: UserRepository,
    profile_repo: ProfileRepository,
    pool: PgPool,
}

impl ProfileService {
    pub fn new(user_repo: UserRepository, profile_repo: ProfileRepository, pool: PgPool) -> Self {
        Self { user_repo, profile_repo, pool }
    }

    // Perfil criado na primeira leitura, com os valores padrão
    pub async fn get_my_data(&self, user: &User) -> Result<MyData, AppError> {
        let profile = self.profile_repo.get_or_create(user.id).await?;
        Ok(my_data(user, profile))
    }

    pub async fn update_my_data(&self, user: &User, payload: &UpdateProfilePayload) -> Result<MyData, AppError> {
        let mut tx = self.pool.begin().await?;

        // Nome e e-mail ficam no usuário, cargo e unidade no perfil
        let user = self
            .user_repo
            .update_contact(&mut *tx, user.id, non_blank(payload.name.as_deref()), non_blank(payload.email.as_deref()))
            .await?;

        let profile = self
            .profile_repo
            .upsert(&mut *tx, user.id, non_blank(payload.job_title.as_deref()), non_blank(payload.unit.as_deref()))
            .await?;

        tx.commit().await?;

        tracing::info!("👤 Dados de {} atualizados.", user.username);
        Ok(my_data(&user, profile))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::user;
    use chrono::Utc;

    #[test]
    fn my_data_uses_display_name_and_profile() {
        let mut u = user("102030", "  ");
        u.email = "maria@saude.gov.br".into();
        let profile = UserProfile {
            user_id: u.id,
            job_title: "Enfermeira".into(),
            unit: "UBS Central".into(),
            updated_at: Utc::now(),
        };

        let data = my_data(&u, profile);
        assert_eq!(data.name, "102030");
        assert_eq!(data.job_title, "Enfermeira");
        assert_eq!(data.unit, "UBS Central");
    }
}
