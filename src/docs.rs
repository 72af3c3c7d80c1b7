use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::modules::auth::controller::ErrorResponse;
use crate::modules::auth::model::{
    MessageResponse, RefreshRequest, RefreshResponse, SessionResponse, SignInRequest,
    SignInResponse,
};
use crate::modules::notes::model::{
    CreateNoteDto, Note, NoteFilterParams, PaginatedNotesResponse, UpdateNoteDto,
};
use crate::modules::tables::model::{
    ColumnInfo, ColumnsResponse, DiscoverySource, FilterOp, SortDirection, TableDescriptor,
    TableDiscovery, TablePage, TableQueryParams,
};
use crate::modules::users::controller::ProfileResponse;
use crate::modules::users::model::{
    CreateUserDto, PaginatedUsersResponse, UpdateUserDto, User, UserFilterParams,
};

use istudio_core::pagination::{PaginationMeta, PaginationParams};

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::modules::auth::controller::sign_in,
        crate::modules::auth::controller::sign_out,
        crate::modules::auth::controller::refresh,
        crate::modules::auth::controller::check_session,
        crate::modules::users::controller::create_user,
        crate::modules::users::controller::get_users,
        crate::modules::users::controller::get_user,
        crate::modules::users::controller::update_user,
        crate::modules::users::controller::delete_user,
        crate::modules::users::controller::get_profile,
        crate::modules::notes::controller::get_notes,
        crate::modules::notes::controller::create_note,
        crate::modules::notes::controller::get_note,
        crate::modules::notes::controller::update_note,
        crate::modules::notes::controller::delete_note,
        crate::modules::tables::controller::list_tables,
        crate::modules::tables::controller::get_columns,
        crate::modules::tables::controller::get_config,
        crate::modules::tables::controller::query_rows,
        crate::modules::tables::controller::insert_row,
        crate::modules::tables::controller::update_row,
        crate::modules::tables::controller::delete_row,
    ),
    components(
        schemas(
            SignInRequest,
            SignInResponse,
            RefreshRequest,
            RefreshResponse,
            SessionResponse,
            MessageResponse,
            ErrorResponse,
            User,
            CreateUserDto,
            UpdateUserDto,
            UserFilterParams,
            PaginatedUsersResponse,
            ProfileResponse,
            Note,
            CreateNoteDto,
            UpdateNoteDto,
            NoteFilterParams,
            PaginatedNotesResponse,
            TableDiscovery,
            DiscoverySource,
            TableDescriptor,
            ColumnInfo,
            ColumnsResponse,
            TableQueryParams,
            TablePage,
            FilterOp,
            SortDirection,
            PaginationMeta,
            PaginationParams,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Authentication", description = "Sign-in, session recovery, and re-validation"),
        (name = "Users", description = "Account management (admin)"),
        (name = "Notes", description = "Personal notes with cached listings"),
        (name = "Tables", description = "Generic table discovery and access (admin)")
    ),
    info(
        title = "iStudio API",
        version = "0.1.0",
        description = "Data-management backend with role/permission-gated routes and a generic table catalog over PostgreSQL.",
        license(
            name = "MIT"
        )
    )
)]
pub struct ApiDoc;

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            )
        }
    }
}
