//! API Routes

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::cors::{Any, CorsLayer};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

use crate::handlers;
use crate::state::AppState;

pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);
    let timeout = TimeoutLayer::new(state.request_timeout);

    Router::new()
        // Health check
        .route("/health", get(handlers::health_check))

        // Bank routes
        .route("/banks", get(handlers::list_banks).post(handlers::create_bank))
        .route(
            "/banks/:id",
            get(handlers::get_bank)
                .put(handlers::rename_bank)
                .delete(handlers::delete_bank),
        )

        // Customer routes
        .route(
            "/customers",
            get(handlers::list_customers).post(handlers::create_customer),
        )
        .route(
            "/customers/:id",
            get(handlers::get_customer)
                .put(handlers::update_customer)
                .delete(handlers::deactivate_customer),
        )

        // Account routes
        .route(
            "/accounts",
            get(handlers::list_accounts).post(handlers::open_account),
        )
        .route("/accounts/transfer", post(handlers::transfer))
        .route(
            "/accounts/:id",
            get(handlers::get_account).delete(handlers::close_account),
        )
        .route("/accounts/:id/deposit", post(handlers::deposit))
        .route("/accounts/:id/withdraw", post(handlers::withdraw))
        .route("/accounts/:id/transactions", get(handlers::account_history))

        // Journal routes
        .route("/transactions", get(handlers::list_transactions))
        .route("/transactions/:id", get(handlers::get_transaction))

        // Ledger routes
        .route("/ledgers", get(handlers::list_ledgers))
        .route("/ledgers/net-transfer", get(handlers::net_transfer))
        .route("/ledgers/:id", get(handlers::get_ledger))

        // Middleware
        .layer(timeout)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
