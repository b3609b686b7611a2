// src/docs.rs

use axum::Json;
use utoipa::openapi::path::{OperationBuilder, ParameterBuilder, ParameterIn};
use utoipa::openapi::request_body::RequestBodyBuilder;
use utoipa::openapi::security::{Http, HttpAuthScheme, SecurityRequirement, SecurityScheme};
use utoipa::openapi::{
    Array, ContentBuilder, HttpMethod, ObjectBuilder, Paths, Ref, RefOr, Required, ResponseBuilder, Schema, Type,
};
use utoipa::{OpenApi, ToSchema};
use crate::common;
use crate::handlers;
use crate::models::{
    self,
    assets::{Allocation, Entity, Equipment, EquipmentType, License, Maintenance, Manufacturer, Ticket, Transfer, Unit},
};

// As coleções genéricas (/api/equipment, /api/licenses, ...) usam um handler só,
// então os caminhos delas entram pelo CollectionPaths, não por `paths(...)`.
#[derive(OpenApi)]
#[openapi(
    paths(
        // --- Auth ---
        handlers::auth::login,
        handlers::auth::logout,
        handlers::auth::change_password,

        // --- Users ---
        handlers::auth::get_me,
        handlers::auth::my_navigation,

        // --- Dashboard ---
        handlers::dashboard::get_summary,

        // --- Staff ---
        handlers::staff::list_staff,
        handlers::staff::get_staff,
        handlers::staff::create_staff,
        handlers::staff::update_staff,
        handlers::staff::delete_staff,
        handlers::staff::update_permissions,

        // --- Usage History ---
        handlers::records::usage_history,
    ),
    components(
        schemas(
            // --- Permissões ---
            models::permission::Role,
            models::permission::ModuleKey,
            models::permission::Action,
            models::permission::ModulePermissions,
            models::permission::PermissionGrid,

            // --- Auth / Staff ---
            models::auth::StaffStatus,
            models::auth::Gender,
            models::auth::User,
            models::auth::LoginPayload,
            models::auth::ChangePasswordPayload,
            models::auth::AuthResponse,
            models::auth::CreateStaffPayload,
            models::auth::UpdateStaffPayload,
            models::auth::UpdatePermissionsPayload,

            // --- Coleções ---
            models::assets::EquipmentStatus,
            models::assets::Equipment,
            models::assets::EquipmentType,
            models::assets::Manufacturer,
            models::assets::Unit,
            models::assets::LicenseStatus,
            models::assets::License,
            models::assets::AllocationStatus,
            models::assets::Allocation,
            models::assets::MaintenanceStatus,
            models::assets::Maintenance,
            models::assets::Transfer,
            models::assets::TicketPriority,
            models::assets::TicketStatus,
            models::assets::Ticket,
            models::assets::UsageHistory,

            // --- Dashboard ---
            models::dashboard::DashboardSummary,

            // --- Listagens ---
            common::query::SortOrder,
        )
    ),
    tags(
        (name = "Auth", description = "Login, logout e troca de senha"),
        (name = "Users", description = "Dados do usuário autenticado"),
        (name = "Dashboard", description = "Indicadores do painel"),
        (name = "Staff", description = "Funcionários e grades de permissão"),
        (name = "Collections", description = "CRUD das coleções de ativos"),
        (name = "Usage History", description = "Registro das alterações")
    ),
    modifiers(&SecurityAddon, &CollectionPaths)
)]
pub struct ApiDoc;

struct SecurityAddon;

impl utoipa::Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "api_jwt",
            SecurityScheme::Http(
                Http::new(HttpAuthScheme::Bearer)
            ),
        );
    }
}

// ---
// Caminhos das coleções genéricas
// ---
struct CollectionPaths;

impl utoipa::Modify for CollectionPaths {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let paths = &mut openapi.paths;
        add_collection::<Equipment>(paths);
        add_collection::<EquipmentType>(paths);
        add_collection::<Manufacturer>(paths);
        add_collection::<Unit>(paths);
        add_collection::<License>(paths);
        add_collection::<Allocation>(paths);
        add_collection::<Maintenance>(paths);
        add_collection::<Transfer>(paths);
        add_collection::<Ticket>(paths);
    }
}

fn json_body(schema: impl Into<RefOr<Schema>>) -> utoipa::openapi::Content {
    ContentBuilder::new().schema(Some(schema)).build()
}

fn operation(id: String, summary: String) -> OperationBuilder {
    OperationBuilder::new()
        .tag("Collections")
        .operation_id(Some(id))
        .summary(Some(summary))
        .security(SecurityRequirement::new("api_jwt", Vec::<String>::new()))
        .response("403", ResponseBuilder::new().description("Sem permissão no módulo").build())
}

fn add_collection<E: Entity + ToSchema>(paths: &mut Paths) {
    let resource = E::RESOURCE;
    let item = || Ref::from_schema_name(E::name());
    let ok = |description: &str, schema: RefOr<Schema>| {
        ResponseBuilder::new().description(description).content("application/json", json_body(schema)).build()
    };
    let body = || RequestBodyBuilder::new().required(Some(Required::True)).content("application/json", json_body(item())).build();
    let id_param = || {
        ParameterBuilder::new()
            .name("id")
            .parameter_in(ParameterIn::Path)
            .required(Required::True)
            .schema(Some(ObjectBuilder::new().schema_type(Type::String)))
            .build()
    };
    let not_found = || ResponseBuilder::new().description("Não encontrado").build();

    let collection = format!("/api/{resource}");
    let single = format!("/api/{resource}/{{id}}");

    paths.add_path_operation(
        &collection,
        vec![HttpMethod::Get],
        operation(format!("list_{resource}"), format!("Lista {resource}"))
            .response("200", ok("Itens da coleção", Array::new(item()).into())),
    );
    paths.add_path_operation(
        &collection,
        vec![HttpMethod::Post],
        operation(format!("create_{resource}"), format!("Cria em {resource}"))
            .request_body(Some(body()))
            .response("201", ok("Item criado", item().into())),
    );
    paths.add_path_operation(
        &single,
        vec![HttpMethod::Get],
        operation(format!("get_{resource}"), format!("Busca em {resource}"))
            .parameter(id_param())
            .response("200", ok("Item", item().into()))
            .response("404", not_found()),
    );
    paths.add_path_operation(
        &single,
        vec![HttpMethod::Put],
        operation(format!("update_{resource}"), format!("Atualiza em {resource} (parcial)"))
            .parameter(id_param())
            .request_body(Some(body()))
            .response("200", ok("Item atualizado", item().into()))
            .response("404", not_found()),
    );
    paths.add_path_operation(
        &single,
        vec![HttpMethod::Delete],
        operation(format!("delete_{resource}"), format!("Exclui de {resource}"))
            .parameter(id_param())
            .response("200", ok("Item excluído", item().into()))
            .response("404", not_found()),
    );
}

// GET /api-docs/openapi.json
pub async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn document_lists_the_protected_routes() {
        let doc = ApiDoc::openapi();
        assert!(doc.paths.paths.contains_key("/api/auth/login"));
        assert!(doc.paths.paths.contains_key("/api/staff/{id}/permissions"));

        let schemes = doc.components.unwrap().security_schemes;
        assert!(schemes.contains_key("api_jwt"));
    }

    #[test]
    fn collections_get_every_crud_operation() {
        let doc = serde_json::to_value(ApiDoc::openapi()).unwrap();
        let paths = &doc["paths"];

        for resource in ["equipment", "licenses", "tickets"] {
            let list = &paths[format!("/api/{resource}")];
            assert!(list["get"].is_object() && list["post"].is_object(), "{resource}");

            let single = &paths[format!("/api/{resource}/{{id}}")];
            for method in ["get", "put", "delete"] {
                assert!(single[method].is_object(), "{method} {resource}");
            }
        }
        assert_eq!(
            paths["/api/equipment/{id}"]["get"]["responses"]["200"]["content"]["application/json"]["schema"]["$ref"],
            "#/components/schemas/Equipment"
        );
    }
}
