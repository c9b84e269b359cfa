// src/services/visibility.rs

use std::collections::BTreeSet;

use uuid::Uuid;

use crate::{models::leave_request::LeaveRequest, services::identity::Identity};

/// O recorte de solicitações que alguém pode listar/ver.
///
/// O repositório traduz isto para um único `WHERE` (ver
/// `LeaveRequestRepository::list_visible`); `permits` responde a mesma
/// pergunta em memória para um registro já carregado.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Visibility {
    /// Anônimo: nada, e sem erro.
    Nothing,
    /// Admin: tudo.
    Everything,
    /// As próprias solicitações + as dos setores sob sua jurisdição.
    Scoped { owner_id: Uuid, units: BTreeSet<String> },
}

impl Visibility {
    pub fn for_caller(caller: Option<&Identity>) -> Self {
        let Some(identity) = caller else {
            return Visibility::Nothing;
        };

        if identity.is_admin() {
            return Visibility::Everything;
        }

        let units = identity
            .managed_units
            .iter()
            .chain(identity.coordinated_units.iter())
            .cloned()
            .collect();

        Visibility::Scoped {
            owner_id: identity.user.id,
            units,
        }
    }

    pub fn permits(&self, request: &LeaveRequest) -> bool {
        match self {
            Visibility::Nothing => false,
            Visibility::Everything => true,
            Visibility::Scoped { owner_id, units } => {
                request.requester_id == *owner_id || units.contains(&request.unit)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::auth::Role;
    use crate::test_support::{identity, request};

    fn all_requests(owners: &[Uuid]) -> Vec<LeaveRequest> {
        let units = ["UBS Central", "UPA Norte", "CAPS", "UBS Vila Toninho"];
        let mut out = Vec::new();
        let mut id = 1;
        for owner in owners {
            for unit in units {
                out.push(request(id, *owner, unit));
                id += 1;
            }
        }
        out
    }

    #[test]
    fn anonymous_sees_nothing() {
        let scope = Visibility::for_caller(None);
        assert_eq!(scope, Visibility::Nothing);
        assert!(all_requests(&[Uuid::new_v4()]).iter().all(|r| !scope.permits(r)));
    }

    #[test]
    fn admin_sees_everything() {
        let admin = identity("admin", Role::Admin, &[], &[]);
        let scope = Visibility::for_caller(Some(&admin));
        assert_eq!(scope, Visibility::Everything);
        assert!(all_requests(&[Uuid::new_v4()]).iter().all(|r| scope.permits(r)));
    }

    #[test]
    fn manager_sees_owned_plus_managed_units() {
        let manager = identity("gerente", Role::Manager, &["UBS Central", "CAPS"], &[]);
        let stranger = Uuid::new_v4();
        let requests = all_requests(&[manager.user.id, stranger]);
        let scope = Visibility::for_caller(Some(&manager));

        for r in &requests {
            let expected = r.requester_id == manager.user.id || r.unit == "UBS Central" || r.unit == "CAPS";
            assert_eq!(scope.permits(r), expected, "request {} in {}", r.id, r.unit);
        }
    }

    #[test]
    fn coordinator_sees_units_of_coordinated_departments() {
        let coord = identity("coord", Role::Coordinator, &[], &["UPA Norte", "UBS Vila Toninho"]);
        let scope = Visibility::for_caller(Some(&coord));

        assert!(scope.permits(&request(1, Uuid::new_v4(), "UPA Norte")));
        assert!(scope.permits(&request(2, Uuid::new_v4(), "UBS Vila Toninho")));
        assert!(!scope.permits(&request(3, Uuid::new_v4(), "UBS Central")));
    }

    #[test]
    fn plain_user_without_jurisdiction_sees_only_own() {
        let user = identity("servidor", Role::User, &[], &[]);
        let scope = Visibility::for_caller(Some(&user));

        assert!(scope.permits(&request(1, user.user.id, "UBS Central")));
        assert!(!scope.permits(&request(2, Uuid::new_v4(), "UBS Central")));
    }

    #[test]
    fn responsibility_counts_even_without_group() {
        // Responsável por setor, mas sem estar no grupo Gerentes
        let user = identity("sem-grupo", Role::User, &["UBS Central"], &[]);
        let scope = Visibility::for_caller(Some(&user));
        assert!(scope.permits(&request(1, Uuid::new_v4(), "UBS Central")));
    }

    #[test]
    fn overlapping_jurisdictions_collapse() {
        let both = identity("duplo", Role::Coordinator, &["CAPS"], &["CAPS", "UPA Norte"]);
        match Visibility::for_caller(Some(&both)) {
            Visibility::Scoped { units, .. } => {
                assert_eq!(units.into_iter().collect::<Vec<_>>(), vec!["CAPS", "UPA Norte"]);
            }
            other => panic!("unexpected scope: {other:?}"),
        }
    }
}
