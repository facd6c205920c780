//! API Router with Swagger UI

use std::sync::Arc;
use std::time::Instant;

use axum::{
    middleware,
    routing::{get, post, put},
    Router,
};
use metrics_exporter_prometheus::PrometheusHandle;
use sea_orm::DatabaseConnection;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};
use utoipa_swagger_ui::SwaggerUi;

use crate::application::{
    BatteryService, BatterySwapService, BookingService, PaymentService, PlanService,
    StationService, SubscriptionService, UserService,
};
use crate::infrastructure::crypto::jwt::JwtConfig;
use crate::interfaces::http::common::{ApiResponse, PaginatedResponse};
use crate::interfaces::http::middleware::{
    auth_middleware, require_admin, require_staff, AuthState,
};

use super::modules::request_id::request_id_middleware;
use super::modules::{
    auth, batteries, battery_swaps, bookings, health, metrics, payments, plans, slots, stations,
    subscriptions, users,
};

/// Everything the HTTP layer needs from the running service.
#[derive(Clone)]
pub struct ApiContext {
    pub db: DatabaseConnection,
    pub jwt_config: JwtConfig,
    pub prometheus_handle: PrometheusHandle,
    pub users: Arc<UserService>,
    pub stations: Arc<StationService>,
    pub batteries: Arc<BatteryService>,
    pub plans: Arc<PlanService>,
    pub subscriptions: Arc<SubscriptionService>,
    pub bookings: Arc<BookingService>,
    pub swaps: Arc<BatterySwapService>,
    pub payments: Arc<PaymentService>,
    /// Currency for plans created without one
    pub default_currency: String,
}

/// Security scheme modifier for OpenAPI
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
                        .description(Some("JWT Bearer token"))
                        .build(),
                ),
            );
        }
    }
}

/// OpenAPI documentation
#[derive(OpenApi)]
#[openapi(
    paths(
        // Health
        health::health_check,
        // Auth
        auth::login,
        auth::register,
        auth::get_current_user,
        auth::change_password,
        // Users
        users::list_users,
        users::get_user,
        users::create_user,
        users::update_user,
        users::delete_user,
        // Stations
        stations::list_stations,
        stations::get_station,
        stations::create_station,
        stations::update_station,
        stations::delete_station,
        stations::list_pillars,
        stations::create_pillar,
        stations::list_slots,
        stations::get_availability,
        // Slots
        slots::set_slot_battery,
        slots::set_slot_status,
        // Batteries
        batteries::list_batteries,
        batteries::get_battery,
        batteries::create_battery,
        batteries::update_battery,
        batteries::delete_battery,
        // Plans
        plans::list_plans,
        plans::get_plan,
        plans::create_plan,
        plans::update_plan,
        plans::delete_plan,
        // Subscriptions
        subscriptions::my_subscriptions,
        subscriptions::list_subscriptions,
        subscriptions::get_subscription,
        subscriptions::cancel_subscription,
        // Bookings
        bookings::create_booking,
        bookings::my_bookings,
        bookings::list_bookings,
        bookings::get_booking,
        bookings::cancel_booking,
        // Battery swaps
        battery_swaps::complete_swap,
        battery_swaps::list_swaps,
        // Payments
        payments::checkout,
        payments::payment_callback,
        payments::my_transactions,
        payments::list_transactions,
    ),
    components(
        schemas(
            // Common
            ApiResponse<String>,
            PaginatedResponse<stations::StationDto>,
            PaginatedResponse<bookings::BookingDto>,
            health::HealthResponse,
            health::ComponentHealth,
            // Auth
            auth::LoginRequest,
            auth::LoginResponse,
            auth::RegisterRequest,
            auth::UserInfo,
            auth::ChangePasswordRequest,
            // Users
            users::UserDto,
            users::CreateUserRequest,
            users::UpdateUserRequest,
            // Stations
            stations::StationDto,
            stations::CreateStationRequest,
            stations::UpdateStationRequest,
            stations::PillarDto,
            stations::CreatePillarRequest,
            stations::PillarWithSlotsDto,
            stations::SlotDto,
            stations::AvailabilityDto,
            // Slots
            slots::SlotBatteryRequest,
            slots::SlotStatusRequest,
            // Batteries
            batteries::BatteryDto,
            batteries::CreateBatteryRequest,
            batteries::UpdateBatteryRequest,
            // Plans
            plans::PlanDto,
            plans::CreatePlanRequest,
            plans::UpdatePlanRequest,
            // Subscriptions
            subscriptions::SubscriptionDto,
            // Bookings
            bookings::BookingDto,
            bookings::BookingDetailsDto,
            bookings::CreateBookingRequest,
            // Battery swaps
            battery_swaps::BatterySwapDto,
            battery_swaps::CompleteSwapRequest,
            // Payments
            payments::TransactionDto,
            payments::CheckoutRequest,
            payments::CheckoutResponse,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Health", description = "Service and database liveness"),
        (name = "Authentication", description = "Login (JWT), driver registration, password change"),
        (name = "Users", description = "Account administration"),
        (name = "Stations", description = "Swap stations, their pillars, slots and availability"),
        (name = "Slots", description = "Staff operations on pillar slots"),
        (name = "Batteries", description = "Battery registry"),
        (name = "Plans", description = "Subscription plan catalogue"),
        (name = "Subscriptions", description = "Driver subscriptions and swap allowance"),
        (name = "Bookings", description = "Swap appointments with slot locking"),
        (name = "Battery Swaps", description = "Completed swaps and swap history"),
        (name = "Payments", description = "Checkout, gateway callbacks and transactions"),
    ),
    info(
        title = "EV Battery-Swap Service API",
        version = "1.0.0",
        description = "REST API for running a battery-swap network",
        license(name = "MIT")
    )
)]
pub struct ApiDoc;

/// Any valid bearer token.
fn authenticated(router: Router, auth: &AuthState) -> Router {
    router.route_layer(middleware::from_fn_with_state(auth.clone(), auth_middleware))
}

/// Staff or admin. The role guard runs after token verification.
fn staff_only(router: Router, auth: &AuthState) -> Router {
    authenticated(router.route_layer(middleware::from_fn(require_staff)), auth)
}

fn admin_only(router: Router, auth: &AuthState) -> Router {
    authenticated(router.route_layer(middleware::from_fn(require_admin)), auth)
}

/// Create the API router with all routes
pub fn create_api_router(ctx: ApiContext) -> Router {
    let guard = AuthState {
        jwt_config: ctx.jwt_config.clone(),
    };

    // ── Auth ───────────────────────────────────────────────────
    let auth_state = auth::AuthHandlerState {
        users: ctx.users.clone(),
    };
    let auth_routes = Router::new()
        .route("/login", post(auth::login))
        .route("/register", post(auth::register))
        .with_state(auth_state.clone());
    let auth_protected_routes = authenticated(
        Router::new()
            .route("/me", get(auth::get_current_user))
            .route("/change-password", put(auth::change_password))
            .with_state(auth_state),
        &guard,
    );

    // ── Users (admin) ──────────────────────────────────────────
    let user_routes = admin_only(
        Router::new()
            .route("/", get(users::list_users).post(users::create_user))
            .route(
                "/{id}",
                get(users::get_user)
                    .put(users::update_user)
                    .delete(users::delete_user),
            )
            .with_state(users::UserHandlerState {
                users: ctx.users.clone(),
            }),
        &guard,
    );

    // ── Stations: public reads, admin writes ───────────────────
    let station_state = stations::StationHandlerState {
        stations: ctx.stations.clone(),
    };
    let station_public = Router::new()
        .route("/", get(stations::list_stations))
        .route("/{id}", get(stations::get_station))
        .route("/{id}/pillars", get(stations::list_pillars))
        .route("/{id}/slots", get(stations::list_slots))
        .route("/{id}/availability", get(stations::get_availability))
        .with_state(station_state.clone());
    let station_admin = admin_only(
        Router::new()
            .route("/", post(stations::create_station))
            .route(
                "/{id}",
                put(stations::update_station).delete(stations::delete_station),
            )
            .route("/{id}/pillars", post(stations::create_pillar))
            .with_state(station_state.clone()),
        &guard,
    );

    // ── Slots (staff) ──────────────────────────────────────────
    let slot_routes = staff_only(
        Router::new()
            .route("/{id}/battery", put(slots::set_slot_battery))
            .route("/{id}/status", put(slots::set_slot_status))
            .with_state(station_state),
        &guard,
    );

    // ── Batteries: any user reads, staff writes ────────────────
    let battery_state = batteries::BatteryHandlerState {
        batteries: ctx.batteries.clone(),
    };
    let battery_read = authenticated(
        Router::new()
            .route("/", get(batteries::list_batteries))
            .route("/{id}", get(batteries::get_battery))
            .with_state(battery_state.clone()),
        &guard,
    );
    let battery_write = staff_only(
        Router::new()
            .route("/", post(batteries::create_battery))
            .route(
                "/{id}",
                put(batteries::update_battery).delete(batteries::delete_battery),
            )
            .with_state(battery_state),
        &guard,
    );

    // ── Plans: public catalogue, admin writes ──────────────────
    let plan_state = plans::PlanHandlerState {
        plans: ctx.plans.clone(),
        default_currency: ctx.default_currency.clone(),
    };
    let plan_public = Router::new()
        .route("/", get(plans::list_plans))
        .route("/{id}", get(plans::get_plan))
        .with_state(plan_state.clone());
    let plan_admin = admin_only(
        Router::new()
            .route("/", post(plans::create_plan))
            .route("/{id}", put(plans::update_plan).delete(plans::delete_plan))
            .with_state(plan_state),
        &guard,
    );

    // ── Subscriptions ──────────────────────────────────────────
    let subscription_state = subscriptions::SubscriptionHandlerState {
        subscriptions: ctx.subscriptions.clone(),
    };
    let subscription_own = authenticated(
        Router::new()
            .route("/me", get(subscriptions::my_subscriptions))
            .route("/{id}", get(subscriptions::get_subscription))
            .route("/{id}/cancel", post(subscriptions::cancel_subscription))
            .with_state(subscription_state.clone()),
        &guard,
    );
    let subscription_admin = admin_only(
        Router::new()
            .route("/", get(subscriptions::list_subscriptions))
            .with_state(subscription_state),
        &guard,
    );

    // ── Bookings ───────────────────────────────────────────────
    let booking_state = bookings::BookingHandlerState {
        bookings: ctx.bookings.clone(),
    };
    let booking_own = authenticated(
        Router::new()
            .route("/", post(bookings::create_booking))
            .route("/me", get(bookings::my_bookings))
            .route("/{id}", get(bookings::get_booking))
            .route("/{id}/cancel", post(bookings::cancel_booking))
            .with_state(booking_state.clone()),
        &guard,
    );
    let booking_staff = staff_only(
        Router::new()
            .route("/", get(bookings::list_bookings))
            .with_state(booking_state),
        &guard,
    );

    // ── Battery swaps ──────────────────────────────────────────
    let swap_state = battery_swaps::SwapHandlerState {
        swaps: ctx.swaps.clone(),
    };
    let swap_history = authenticated(
        Router::new()
            .route("/", get(battery_swaps::list_swaps))
            .with_state(swap_state.clone()),
        &guard,
    );
    let swap_staff = staff_only(
        Router::new()
            .route("/", post(battery_swaps::complete_swap))
            .with_state(swap_state),
        &guard,
    );

    // ── Payments ───────────────────────────────────────────────
    let payment_state = payments::PaymentHandlerState {
        payments: ctx.payments.clone(),
    };
    // The gateway redirects here without a token; the signature authenticates it.
    let payment_callback = Router::new()
        .route("/callback", get(payments::payment_callback))
        .with_state(payment_state.clone());
    let payment_own = authenticated(
        Router::new()
            .route("/checkout", post(payments::checkout))
            .route("/transactions/me", get(payments::my_transactions))
            .with_state(payment_state.clone()),
        &guard,
    );
    let payment_admin = admin_only(
        Router::new()
            .route("/transactions", get(payments::list_transactions))
            .with_state(payment_state),
        &guard,
    );

    // ── Health & metrics ───────────────────────────────────────
    let health_routes = Router::new()
        .route("/health", get(health::health_check))
        .with_state(health::HealthState {
            db: ctx.db.clone(),
            started_at: Arc::new(Instant::now()),
        });
    let metrics_routes = Router::new()
        .route("/metrics", get(metrics::prometheus_metrics))
        .with_state(metrics::MetricsState {
            handle: ctx.prometheus_handle.clone(),
        });

    // CORS configuration
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .merge(SwaggerUi::new("/docs").url("/api-doc/openapi.json", ApiDoc::openapi()))
        .merge(health_routes)
        .merge(metrics_routes)
        .nest("/api/v1/auth", auth_routes.merge(auth_protected_routes))
        .nest("/api/v1/users", user_routes)
        .nest("/api/v1/stations", station_public.merge(station_admin))
        .nest("/api/v1/slots", slot_routes)
        .nest("/api/v1/batteries", battery_read.merge(battery_write))
        .nest("/api/v1/plans", plan_public.merge(plan_admin))
        .nest(
            "/api/v1/subscriptions",
            subscription_own.merge(subscription_admin),
        )
        .nest("/api/v1/bookings", booking_own.merge(booking_staff))
        .nest("/api/v1/battery-swaps", swap_history.merge(swap_staff))
        .nest(
            "/api/v1/payments",
            payment_callback.merge(payment_own).merge(payment_admin),
        )
        .layer(middleware::from_fn(metrics::http_metrics_middleware))
        .layer(middleware::from_fn(request_id_middleware))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{header, Request, StatusCode};
    use metrics_exporter_prometheus::PrometheusBuilder;
    use tower::Service;

    use crate::application::test_support;
    use crate::application::{BookingPolicy, PaymentGatewayConfig, SlotLockService};
    use crate::domain::UserRole;
    use crate::infrastructure::crypto::jwt::create_token;
    use crate::infrastructure::crypto::payment_signature::sign_params;
    use crate::infrastructure::database::test_connection;
    use crate::SeaOrmRepositoryProvider;

    fn jwt() -> JwtConfig {
        JwtConfig::new("router-test-secret", 1)
    }

    fn gateway() -> PaymentGatewayConfig {
        PaymentGatewayConfig {
            gateway_url: "https://gateway.test/pay".to_string(),
            merchant_code: "EVSWAP".to_string(),
            secret: "s3cret".to_string(),
            return_url: "https://app.test/return".to_string(),
        }
    }

    fn callback_uri(txn_ref: &str, amount: i64, signature: Option<&str>) -> String {
        let mut params = vec![
            ("txn_ref".to_string(), txn_ref.to_string()),
            ("response_code".to_string(), "00".to_string()),
            ("amount".to_string(), amount.to_string()),
        ];
        let signature = match signature {
            Some(sig) => sig.to_string(),
            None => sign_params("s3cret", &params),
        };
        params.push(("signature".to_string(), signature));
        let query = url::form_urlencoded::Serializer::new(String::new())
            .extend_pairs(&params)
            .finish();
        format!("/api/v1/payments/callback?{}", query)
    }

    async fn app() -> (Router, Arc<dyn crate::domain::RepositoryProvider>) {
        let db = test_connection().await;
        let repos: Arc<dyn crate::domain::RepositoryProvider> =
            Arc::new(SeaOrmRepositoryProvider::new(db.clone()));
        let slot_lock = SlotLockService::new(repos.clone());
        let policy = BookingPolicy {
            max_days_ahead: 7,
            grace_minutes: 30,
        };
        let ctx = ApiContext {
            db,
            jwt_config: jwt(),
            prometheus_handle: PrometheusBuilder::new().build_recorder().handle(),
            users: Arc::new(UserService::new(repos.clone(), jwt())),
            stations: Arc::new(StationService::new(repos.clone())),
            batteries: Arc::new(BatteryService::new(repos.clone())),
            plans: Arc::new(PlanService::new(repos.clone())),
            subscriptions: Arc::new(SubscriptionService::new(repos.clone(), slot_lock.clone())),
            bookings: Arc::new(BookingService::new(repos.clone(), slot_lock, policy)),
            swaps: Arc::new(BatterySwapService::new(repos.clone())),
            payments: Arc::new(PaymentService::new(repos.clone(), gateway())),
            default_currency: "VND".to_string(),
        };
        (create_api_router(ctx), repos)
    }

    async fn call(router: &Router, method: &str, uri: &str, token: Option<&str>) -> StatusCode {
        let mut req = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            req = req.header(header::AUTHORIZATION, format!("Bearer {}", token));
        }
        let req = req
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from("{}"))
            .unwrap();
        let mut svc = router.clone().into_service();
        svc.call(req).await.unwrap().status()
    }

    fn token(role: &str) -> String {
        create_token("u-1", "someone", role, &jwt()).unwrap()
    }

    #[tokio::test]
    async fn public_routes_need_no_token() {
        let (router, repos) = app().await;
        test_support::seed_plan(&repos, 1, 10).await;

        assert_eq!(call(&router, "GET", "/health", None).await, StatusCode::OK);
        assert_eq!(call(&router, "GET", "/api/v1/plans", None).await, StatusCode::OK);
        assert_eq!(call(&router, "GET", "/api/v1/stations", None).await, StatusCode::OK);
    }

    #[tokio::test]
    async fn writes_on_public_paths_still_require_a_token() {
        let (router, _) = app().await;
        assert_eq!(
            call(&router, "POST", "/api/v1/plans", None).await,
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            call(&router, "POST", "/api/v1/stations", Some(&token("driver"))).await,
            StatusCode::FORBIDDEN
        );
    }

    #[tokio::test]
    async fn role_guards_per_route_group() {
        let (router, repos) = app().await;
        let admin = test_support::seed_user(&repos, "boss", UserRole::Admin).await;
        let admin_token = create_token(&admin.id, "boss", "admin", &jwt()).unwrap();

        assert_eq!(
            call(&router, "GET", "/api/v1/users", Some(&token("staff"))).await,
            StatusCode::FORBIDDEN
        );
        assert_eq!(
            call(&router, "GET", "/api/v1/users", Some(&admin_token)).await,
            StatusCode::OK
        );
        assert_eq!(
            call(&router, "GET", "/api/v1/bookings", Some(&token("driver"))).await,
            StatusCode::FORBIDDEN
        );
        assert_eq!(
            call(&router, "GET", "/api/v1/bookings", Some(&token("staff"))).await,
            StatusCode::OK
        );
        assert_eq!(
            call(&router, "GET", "/api/v1/batteries", None).await,
            StatusCode::UNAUTHORIZED
        );
    }

    #[tokio::test]
    async fn unknown_route_is_not_found() {
        let (router, _) = app().await;
        assert_eq!(
            call(&router, "GET", "/api/v1/nowhere", None).await,
            StatusCode::NOT_FOUND
        );
    }

    #[tokio::test]
    async fn payment_callback_is_public_and_maps_errors() {
        let (router, repos) = app().await;

        assert_eq!(
            call(&router, "GET", &callback_uri("missing", 200_000, Some("00ff")), None).await,
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            call(&router, "GET", &callback_uri("missing", 200_000, None), None).await,
            StatusCode::NOT_FOUND
        );

        let driver = test_support::seed_user(&repos, "rider", UserRole::Driver).await;
        let plan = test_support::seed_plan(&repos, 1, 10).await;
        let checkout = PaymentService::new(repos.clone(), gateway())
            .checkout(&driver.id, plan.id)
            .await
            .unwrap();
        let txn = &checkout.transaction;
        assert_eq!(
            call(&router, "GET", &callback_uri(&txn.id, txn.amount + 1, None), None).await,
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            call(&router, "GET", &callback_uri(&txn.id, txn.amount, None), None).await,
            StatusCode::OK
        );
    }
}
