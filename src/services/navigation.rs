// src/services/navigation.rs

use serde::{Deserialize, Serialize};

use crate::{
    models::{auth::User, permission::{ModuleKey, Role}},
    services::permission::{can_role, can_view},
};

pub const LOGIN_PATH: &str = "/login";
pub const CHANGE_PASSWORD_PATH: &str = "/change-password";

// Item estático da árvore de navegação
#[derive(Debug)]
pub struct NavItem {
    pub label: &'static str,
    pub href: &'static str,
    pub module: Option<ModuleKey>,
    pub roles: &'static [Role],
    pub children: &'static [NavItem],
}

// O que o cliente recebe: só o que o usuário pode ver
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VisibleNavItem {
    pub label: String,
    pub href: String,
    pub module: Option<ModuleKey>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<VisibleNavItem>,
}

const EVERYONE: &[Role] = &[Role::Admin, Role::UnitManager, Role::Employee];
const MANAGERS: &[Role] = &[Role::Admin, Role::UnitManager];
const ADMINS: &[Role] = &[Role::Admin];

const fn link(label: &'static str, href: &'static str, module: ModuleKey, roles: &'static [Role]) -> NavItem {
    NavItem { label, href, module: Some(module), roles, children: &[] }
}

pub static NAVIGATION: &[NavItem] = &[
    link("Dashboard", "/dashboard", ModuleKey::Dashboard, EVERYONE),
    NavItem {
        label: "Assets",
        href: "/assets",
        module: None,
        roles: EVERYONE,
        children: &[
            link("Equipment", "/equipment", ModuleKey::Equipment, EVERYONE),
            link("Equipment types", "/equipment-types", ModuleKey::EquipmentTypes, MANAGERS),
            link("Manufacturers", "/manufacturers", ModuleKey::Manufacturers, MANAGERS),
            link("Licenses", "/licenses", ModuleKey::Licenses, EVERYONE),
            link("Network", "/network", ModuleKey::Network, MANAGERS),
        ],
    },
    NavItem {
        label: "Operations",
        href: "/operations",
        module: None,
        roles: EVERYONE,
        children: &[
            link("Allocation", "/allocation", ModuleKey::Allocation, EVERYONE),
            link("Maintenance", "/maintenance", ModuleKey::Maintenance, EVERYONE),
            link("Repairs", "/repairs", ModuleKey::Repairs, EVERYONE),
            link("Transfers", "/transfers", ModuleKey::Transfers, EVERYONE),
            link("Usage history", "/usage-history", ModuleKey::UsageHistory, MANAGERS),
        ],
    },
    NavItem {
        label: "Organization",
        href: "/organization",
        module: None,
        roles: EVERYONE,
        children: &[
            link("Staff", "/staff", ModuleKey::Staff, EVERYONE),
            link("Units", "/units", ModuleKey::Units, EVERYONE),
        ],
    },
    link("Reports", "/reports", ModuleKey::Reports, EVERYONE),
    NavItem {
        label: "Administration",
        href: "/admin",
        module: None,
        roles: ADMINS,
        children: &[
            link("Permissions", "/permissions", ModuleKey::Permissions, ADMINS),
            link("Roles", "/roles", ModuleKey::Roles, ADMINS),
            link("Database explorer", "/database-explorer", ModuleKey::DatabaseExplorer, ADMINS),
            link("Settings", "/settings", ModuleKey::Settings, ADMINS),
        ],
    },
    NavItem { label: "Account", href: "/account", module: None, roles: EVERYONE, children: &[] },
];

fn visible_item(user: Option<&User>, item: &NavItem) -> Option<VisibleNavItem> {
    if !can_role(user, item.roles) || !can_view(user, item.module) {
        return None;
    }

    let children: Vec<_> = item.children.iter().filter_map(|c| visible_item(user, c)).collect();
    // Grupo sem nenhum filho visível some junto
    if !item.children.is_empty() && children.is_empty() {
        return None;
    }

    Some(VisibleNavItem {
        label: item.label.to_string(),
        href: item.href.to_string(),
        module: item.module,
        children,
    })
}

pub fn visible_navigation(user: Option<&User>) -> Vec<VisibleNavItem> {
    NAVIGATION.iter().filter_map(|item| visible_item(user, item)).collect()
}

/// Sem query string nem barra final; a raiz vira `/dashboard`.
pub fn normalize_path(path: &str) -> &str {
    let path = path.split(['?', '#']).next().unwrap_or(path);
    match path.trim_end_matches('/') {
        "" => "/dashboard",
        trimmed => trimmed,
    }
}

fn find_in<'a>(items: &'a [NavItem], path: &str) -> Option<&'a NavItem> {
    items.iter().find_map(|item| {
        find_in(item.children, path).or_else(|| {
            let matches = path == item.href
                || path.strip_prefix(item.href).is_some_and(|rest| rest.starts_with('/'));
            (matches && item.children.is_empty()).then_some(item)
        })
    })
}

/// Item folha que atende o caminho (`/equipment/123` cai em `/equipment`).
pub fn find_route(path: &str) -> Option<&'static NavItem> {
    find_in(NAVIGATION, normalize_path(path))
}

pub fn module_for_path(path: &str) -> Option<ModuleKey> {
    find_route(path).and_then(|item| item.module)
}

/// Caminhos fora da árvore (conta, página 404) ficam liberados.
pub fn route_allowed(user: Option<&User>, path: &str) -> bool {
    match find_route(path) {
        Some(item) => can_role(user, item.roles) && can_view(user, item.module),
        None => true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        models::permission::{ModulePermissions, PermissionGrid},
        services::permission::tests::user_with,
    };

    fn labels(items: &[VisibleNavItem]) -> Vec<&str> {
        items.iter().map(|i| i.label.as_str()).collect()
    }

    #[test]
    fn admin_sees_the_whole_tree() {
        let admin = user_with(Role::Admin, PermissionGrid::deny_all());
        let nav = visible_navigation(Some(&admin));

        assert_eq!(nav.len(), NAVIGATION.len());
        let administration = nav.iter().find(|i| i.label == "Administration").unwrap();
        assert_eq!(administration.children.len(), 4);
    }

    #[test]
    fn empty_groups_are_hidden() {
        let user = user_with(
            Role::Employee,
            PermissionGrid::deny_all().with(ModuleKey::Dashboard, ModulePermissions::VIEW_ONLY),
        );

        assert_eq!(labels(&visible_navigation(Some(&user))), vec!["Dashboard", "Account"]);
    }

    #[test]
    fn role_filter_applies_even_with_grid_access() {
        let user = user_with(
            Role::Employee,
            PermissionGrid::for_role(Role::Employee).with(ModuleKey::Settings, ModulePermissions::FULL),
        );
        let nav = visible_navigation(Some(&user));

        assert!(!labels(&nav).contains(&"Administration"));
        let assets = nav.iter().find(|i| i.label == "Assets").unwrap();
        assert_eq!(labels(&assets.children), vec!["Equipment"]);
    }

    #[test]
    fn anonymous_sees_nothing_gated() {
        assert!(visible_navigation(None).is_empty());
    }

    #[test]
    fn paths_resolve_to_their_module() {
        assert_eq!(module_for_path("/"), Some(ModuleKey::Dashboard));
        assert_eq!(module_for_path("/equipment/42?tab=history"), Some(ModuleKey::Equipment));
        assert_eq!(module_for_path("/equipment-types"), Some(ModuleKey::EquipmentTypes));
        assert_eq!(module_for_path("/account"), None);
        assert_eq!(module_for_path("/assets"), None);
        assert_eq!(module_for_path("/nowhere"), None);
    }

    #[test]
    fn route_checks_match_navigation() {
        let user = user_with(Role::Employee, PermissionGrid::for_role(Role::Employee));

        assert!(route_allowed(Some(&user), "/dashboard"));
        assert!(route_allowed(Some(&user), "/account"));
        assert!(!route_allowed(Some(&user), "/licenses"));
        assert!(!route_allowed(Some(&user), "/settings"));
    }
}
