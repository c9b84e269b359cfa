//src/main.rs

use axum::{
    middleware as axum_middleware,
    routing::{get, post},
    Router,
};
use tokio::net::TcpListener;
use tracing_subscriber::EnvFilter;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

mod common;
mod config;
mod db;
mod docs;
mod handlers;
mod middleware;
mod models;
mod services;

#[cfg(test)]
mod test_support;

use crate::config::AppState;
use crate::docs::ApiDoc;
use crate::middleware::auth::auth_guard;

pub fn app(app_state: AppState) -> Router {
    // Rotas abertas
    let auth_routes = Router::new()
        .route("/register", post(handlers::auth::register))
        .route("/login", post(handlers::auth::login))
        .route("/password-reset/request", post(handlers::auth::request_password_reset))
        .route("/password-reset/confirm", post(handlers::auth::confirm_password_reset));

    // Anônimo lista (e recebe []); o resto exige token
    let public_request_routes = Router::new()
        .route("/solicitacoes", get(handlers::leave_requests::list_requests));

    let protected_request_routes = Router::new()
        .route("/solicitacoes", post(handlers::leave_requests::create_request))
        .route("/solicitacoes/{id}", get(handlers::leave_requests::get_request))
        .route("/solicitacoes/{id}/aprovar", post(handlers::leave_requests::approve_request))
        .route("/solicitacoes/{id}/reprovar", post(handlers::leave_requests::reject_request))
        .route("/solicitacoes/{id}/pdf", get(handlers::documents::request_pdf))
        .route(
            "/setores",
            get(handlers::organization::list_units).post(handlers::organization::create_unit),
        )
        .route(
            "/departamentos",
            get(handlers::organization::list_departments)
                .post(handlers::organization::create_department),
        )
        .route_layer(axum_middleware::from_fn_with_state(
            app_state.clone(),
            auth_guard,
        ));

    let user_routes = Router::new()
        .route(
            "/me",
            get(handlers::profile::get_me).patch(handlers::profile::update_me),
        )
        .route("/me/password", post(handlers::profile::change_password))
        .route_layer(axum_middleware::from_fn_with_state(
            app_state.clone(),
            auth_guard,
        ));

    let api_routes = public_request_routes.merge(protected_request_routes);

    // Combina tudo no router principal
    Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .route("/api/health", get(|| async { "OK" }))
        .nest("/api/auth", auth_routes)
        .nest("/api/users", user_routes)
        .nest("/api", api_routes)
        .with_state(app_state)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // RUST_LOG manda; sem ele, info
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_target(false)
        .compact()
        .init();

    // Se a configuração falhar, a aplicação não deve iniciar.
    let app_state = AppState::new().await?;

    sqlx::migrate!().run(&app_state.db_pool).await?;
    tracing::info!("✅ Migrações do banco de dados executadas com sucesso!");

    let bind_addr = app_state.config.bind_addr.clone();
    let app = app(app_state);

    // Inicia o servidor
    let listener = TcpListener::bind(&bind_addr).await?;
    tracing::info!("🚀 Servidor escutando em {}", listener.local_addr()?);
    axum::serve(listener, app).await?;

    Ok(())
}
