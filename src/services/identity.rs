// src/services/identity.rs

use crate::{
    common::error::AppError,
    db::{OrganizationRepository, UserRepository},
    models::auth::{Role, User},
};

pub const MANAGERS_GROUP: &str = "Gerentes";
pub const COORDINATORS_GROUP: &str = "Coordenadores";

/// Primeiro que casar vence: superusuário > Coordenadores > Gerentes > servidor.
pub fn resolve_role<S: AsRef<str>>(is_superuser: bool, groups: &[S]) -> Role {
    let in_group = |name: &str| groups.iter().any(|g| g.as_ref() == name);

    if is_superuser {
        Role::Admin
    } else if in_group(COORDINATORS_GROUP) {
        Role::Coordinator
    } else if in_group(MANAGERS_GROUP) {
        Role::Manager
    } else {
        Role::User
    }
}

// Quem está chamando, já com o papel e a jurisdição resolvidos.
// Montado uma vez no middleware e repassado explicitamente daí em diante.
#[derive(Debug, Clone)]
pub struct Identity {
    pub user: User,
    pub role: Role,
    // Setores em que é o gerente responsável
    pub managed_units: Vec<String>,
    // Setores dos departamentos em que é o coordenador responsável
    pub coordinated_units: Vec<String>,
}

impl Identity {
    pub fn display_name(&self) -> &str {
        self.user.display_name()
    }

    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }
}

#[derive(Clone)]
pub struct IdentityService {
    user_repo: UserRepository,
    org_repo: OrganizationRepository,
}

impl IdentityService {
    pub fn new(user_repo: UserRepository, org_repo: OrganizationRepository) -> Self {
        Self { user_repo, org_repo }
    }

    pub async fn resolve(&self, user: User) -> Result<Identity, AppError> {
        let groups = self.user_repo.list_groups(user.id).await?;
        let role = resolve_role(user.is_superuser, &groups);

        // Admin enxerga tudo, a hierarquia não muda nada para ele
        let (managed_units, coordinated_units) = if role == Role::Admin {
            (Vec::new(), Vec::new())
        } else {
            (
                self.org_repo.unit_names_managed_by(user.id).await?,
                self.org_repo.unit_names_coordinated_by(user.id).await?,
            )
        };

        Ok(Identity {
            user,
            role,
            managed_units,
            coordinated_units,
        })
    }
}
