// crates/customer-contract/tests/helpers/customer_stub.rs
// ============================================================================
// Module: Customer Stub
// Description: In-process customer API stub for contract tests.
// Purpose: Exercise the suite over real HTTP without an external server.
// Dependencies: axum, customer-contract, tokio
// ============================================================================

use std::collections::BTreeMap;
use std::net::TcpListener as StdTcpListener;
use std::sync::Arc;
use std::sync::Mutex;
use std::thread;

use async_trait::async_trait;
use axum::Json;
use axum::Router;
use axum::extract::Path;
use axum::extract::State;
use axum::http::HeaderMap;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::response::Response;
use axum::routing::get;
use customer_contract::ContractError;
use customer_contract::Customer;
use customer_contract::FixtureSeeder;
use customer_contract::FixtureSet;
use customer_contract::NewCustomer;
use serde_json::json;
use tokio::runtime::Builder;
use tokio::sync::oneshot;

/// Faults the stub can inject to exercise failure paths.
#[derive(Clone, Debug, Default)]
pub struct StubFaults {
    /// Alters the email returned by `GET /customer/{id}`.
    pub tamper_get_email: bool,
    /// Replaces the 201 returned by `POST /customer`.
    pub create_status: Option<u16>,
    /// Reverses the collection order on every other `GET /customer`.
    pub unstable_list_order: bool,
}

/// Request metadata captured by the stub.
#[derive(Clone, Debug)]
pub struct RecordedRequest {
    /// HTTP method.
    pub method: &'static str,
    /// Request path without the host.
    pub path: String,
    /// Header names (lowercase) and UTF-8 values.
    pub headers: BTreeMap<String, String>,
}

#[derive(Default)]
struct StubData {
    rows: BTreeMap<i64, Customer>,
    next_id: i64,
    list_calls: u64,
    faults: StubFaults,
    requests: Vec<RecordedRequest>,
}

impl StubData {
    fn seed(&mut self, fixtures: &FixtureSet) {
        self.rows = fixtures.rows.iter().map(|row| (row.id, row.clone())).collect();
        self.next_id = self.rows.keys().max().copied().unwrap_or(0) + 1;
        self.list_calls = 0;
    }
}

#[derive(Clone)]
struct StubState {
    data: Arc<Mutex<StubData>>,
}

impl StubState {
    fn with<T>(&self, f: impl FnOnce(&mut StubData) -> T) -> T {
        let mut guard = match self.data.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        f(&mut guard)
    }

    fn record(&self, method: &'static str, path: String, headers: &HeaderMap) {
        let headers = headers
            .iter()
            .filter_map(|(name, value)| {
                value.to_str().ok().map(|value| (name.as_str().to_string(), value.to_string()))
            })
            .collect();
        self.with(|data| {
            data.requests.push(RecordedRequest {
                method,
                path,
                headers,
            });
        });
    }
}

/// Handle for the customer stub server.
pub struct CustomerStubHandle {
    base_url: String,
    state: StubState,
    shutdown: Option<oneshot::Sender<()>>,
    join: Option<thread::JoinHandle<()>>,
}

impl CustomerStubHandle {
    /// Returns the stub base URL.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Returns captured requests.
    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.state.with(|data| data.requests.clone())
    }

    /// Returns the rows currently held by the stub.
    pub fn rows(&self) -> Vec<Customer> {
        self.state.with(|data| data.rows.values().cloned().collect())
    }

    /// Replaces the injected faults.
    pub fn set_faults(&self, faults: StubFaults) {
        self.state.with(|data| data.faults = faults);
    }

    /// Returns a seeder that resets this stub.
    pub fn seeder(&self) -> StubSeeder {
        StubSeeder {
            state: self.state.clone(),
        }
    }
}

impl Drop for CustomerStubHandle {
    fn drop(&mut self) {
        if let Some(shutdown) = self.shutdown.take() {
            let _ = shutdown.send(());
        }
        if let Some(join) = self.join.take() {
            let _ = join.join();
        }
    }
}

/// Seeder that resets the stub rows to a fixture set.
pub struct StubSeeder {
    state: StubState,
}

#[async_trait]
impl FixtureSeeder for StubSeeder {
    async fn reset(&self, fixtures: &FixtureSet) -> Result<(), ContractError> {
        self.state.with(|data| data.seed(fixtures));
        Ok(())
    }
}

/// Spawns a stub seeded with `fixtures`.
pub fn spawn_customer_stub(fixtures: &FixtureSet) -> Result<CustomerStubHandle, String> {
    let listener = StdTcpListener::bind("127.0.0.1:0")
        .map_err(|err| format!("customer stub bind failed: {err}"))?;
    listener
        .set_nonblocking(true)
        .map_err(|err| format!("customer stub listener nonblocking failed: {err}"))?;
    let addr =
        listener.local_addr().map_err(|err| format!("customer stub local addr failed: {err}"))?;
    let base_url = format!("http://{addr}");

    let mut data = StubData::default();
    data.seed(fixtures);
    let state = StubState {
        data: Arc::new(Mutex::new(data)),
    };
    let app = Router::new()
        .route("/customer", get(list_customers).post(create_customer))
        .route(
            "/customer/{id}",
            get(get_customer).put(update_customer).delete(delete_customer),
        )
        .with_state(state.clone());
    let (shutdown_tx, shutdown_rx) = oneshot::channel();
    let join = thread::spawn(move || {
        let Ok(runtime) = Builder::new_current_thread().enable_all().build() else {
            return;
        };
        runtime.block_on(async move {
            let Ok(listener) = tokio::net::TcpListener::from_std(listener) else {
                return;
            };
            let server = axum::serve(listener, app).with_graceful_shutdown(async move {
                let _ = shutdown_rx.await;
            });
            let _ = server.await;
        });
    });
    Ok(CustomerStubHandle {
        base_url,
        state,
        shutdown: Some(shutdown_tx),
        join: Some(join),
    })
}

fn not_found(id: i64) -> Response {
    (StatusCode::NOT_FOUND, Json(json!({"error": format!("customer {id} not found")})))
        .into_response()
}

async fn list_customers(State(state): State<StubState>, headers: HeaderMap) -> Response {
    state.record("GET", "/customer".to_string(), &headers);
    let rows = state.with(|data| {
        data.list_calls += 1;
        let mut rows: Vec<Customer> = data.rows.values().cloned().collect();
        if data.faults.unstable_list_order && data.list_calls % 2 == 0 {
            rows.reverse();
        }
        rows
    });
    (StatusCode::OK, Json(rows)).into_response()
}

async fn create_customer(
    State(state): State<StubState>,
    headers: HeaderMap,
    Json(body): Json<NewCustomer>,
) -> Response {
    state.record("POST", "/customer".to_string(), &headers);
    let (customer, status) = state.with(|data| {
        let id = data.next_id;
        data.next_id += 1;
        let customer = body.with_id(id);
        data.rows.insert(id, customer.clone());
        let status = data
            .faults
            .create_status
            .and_then(|code| StatusCode::from_u16(code).ok())
            .unwrap_or(StatusCode::CREATED);
        (customer, status)
    });
    (status, Json(customer)).into_response()
}

async fn get_customer(
    State(state): State<StubState>,
    Path(id): Path<i64>,
    headers: HeaderMap,
) -> Response {
    state.record("GET", format!("/customer/{id}"), &headers);
    let found = state.with(|data| {
        data.rows.get(&id).cloned().map(|mut row| {
            if data.faults.tamper_get_email {
                row.email = format!("tampered.{}", row.email);
            }
            row
        })
    });
    match found {
        Some(row) => (StatusCode::OK, Json(row)).into_response(),
        None => not_found(id),
    }
}

async fn update_customer(
    State(state): State<StubState>,
    Path(id): Path<i64>,
    headers: HeaderMap,
    Json(body): Json<Customer>,
) -> Response {
    state.record("PUT", format!("/customer/{id}"), &headers);
    let updated = state.with(|data| {
        let row = data.rows.get_mut(&id)?;
        *row = body.fields().with_id(id);
        Some(row.clone())
    });
    match updated {
        Some(row) => (StatusCode::OK, Json(row)).into_response(),
        None => not_found(id),
    }
}

async fn delete_customer(
    State(state): State<StubState>,
    Path(id): Path<i64>,
    headers: HeaderMap,
) -> Response {
    state.record("DELETE", format!("/customer/{id}"), &headers);
    match state.with(|data| data.rows.remove(&id)) {
        Some(_) => StatusCode::NO_CONTENT.into_response(),
        None => not_found(id),
    }
}
