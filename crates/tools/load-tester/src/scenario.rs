//! Virtual users and the weighted tasks they run.

use std::time::Duration;

use clap::ValueEnum;
use rand::distributions::{Distribution, WeightedIndex};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use reqwest::{Client, StatusCode};
use serde_json::{json, Value};
use tokio::time::{sleep_until, Instant};
use tracing::{debug, warn};

use crate::stats::Report;

const USERS_PATH: &str = "/api/v1/task/users/";
const PRODUCTS_PATH: &str = "/api/v1/task1/products/";

const LOAD_BIO: &str =
    "This is a sufficiently long bio with more than 50 characters for load testing.";
const UPDATED_BIO: &str =
    "This is an updated bio with more than 50 characters for load testing purposes.";

/// Which endpoints a run exercises
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scenario {
    Users,
    Products,
    /// Alternate virtual users between the two
    All,
}

impl Scenario {
    /// Concrete scenario of the `index`-th virtual user
    pub fn for_user(self, index: usize) -> Scenario {
        match self {
            Scenario::All if index % 2 == 0 => Scenario::Users,
            Scenario::All => Scenario::Products,
            other => other,
        }
    }

    pub fn tasks(self) -> &'static [Task] {
        match self {
            Scenario::Users => &[
                Task::ListUsers,
                Task::CreateUser,
                Task::UpdateUser,
                Task::CreateInvalidUser,
            ],
            Scenario::Products | Scenario::All => &[
                Task::ListProducts,
                Task::TopByCategory,
                Task::TopTen,
                Task::CategoryCounts,
                Task::Pagination,
            ],
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Task {
    ListUsers,
    CreateUser,
    UpdateUser,
    CreateInvalidUser,
    ListProducts,
    TopByCategory,
    TopTen,
    CategoryCounts,
    Pagination,
}

impl Task {
    pub fn name(self) -> &'static str {
        match self {
            Task::ListUsers => "list_users",
            Task::CreateUser => "create_user",
            Task::UpdateUser => "update_user",
            Task::CreateInvalidUser => "create_invalid_user",
            Task::ListProducts => "list_products",
            Task::TopByCategory => "top_most_expensive_by_category",
            Task::TopTen => "top_10_most_expensive",
            Task::CategoryCounts => "products_with_category_counts",
            Task::Pagination => "pagination",
        }
    }

    pub fn weight(self) -> u32 {
        match self {
            Task::ListProducts => 3,
            Task::ListUsers | Task::CreateUser | Task::TopByCategory | Task::TopTen => 2,
            Task::UpdateUser
            | Task::CreateInvalidUser
            | Task::CategoryCounts
            | Task::Pagination => 1,
        }
    }
}

/// Wait bounds between two tasks of one virtual user
#[derive(Debug, Clone, Copy)]
pub struct Pacing {
    pub min_wait: Duration,
    pub max_wait: Duration,
}

impl Pacing {
    fn next_wait(&self, rng: &mut StdRng) -> Duration {
        if self.max_wait <= self.min_wait {
            return self.min_wait;
        }
        rng.gen_range(self.min_wait..=self.max_wait)
    }
}

/// One simulated client
pub struct VirtualUser {
    client: Client,
    host: String,
    scenario: Scenario,
    rng: StdRng,
    user_id: Option<i64>,
    report: Report,
}

impl VirtualUser {
    pub fn new(client: Client, host: impl Into<String>, scenario: Scenario) -> Self {
        Self {
            client,
            host: host.into().trim_end_matches('/').to_string(),
            scenario,
            rng: StdRng::from_entropy(),
            user_id: None,
            report: Report::default(),
        }
    }

    /// Run weighted tasks until `deadline`, then hand back the statistics.
    pub async fn run(mut self, deadline: Instant, pacing: Pacing) -> Report {
        if self.scenario == Scenario::Users {
            self.run_task(Task::CreateUser).await;
        }

        let tasks = self.scenario.tasks();
        let chooser = match WeightedIndex::new(tasks.iter().map(|task| task.weight())) {
            Ok(chooser) => chooser,
            Err(e) => {
                warn!(error = %e, "No runnable tasks");
                return self.report;
            }
        };

        while Instant::now() < deadline {
            let task = tasks[chooser.sample(&mut self.rng)];
            self.run_task(task).await;

            let wake = Instant::now() + pacing.next_wait(&mut self.rng);
            sleep_until(wake.min(deadline)).await;
        }

        self.report
    }

    async fn run_task(&mut self, task: Task) {
        match task {
            Task::ListUsers => self.get(task, USERS_PATH).await,
            Task::CreateUser => self.create_user().await,
            Task::UpdateUser => self.update_user().await,
            Task::CreateInvalidUser => self.create_invalid_user().await,
            Task::ListProducts => self.get(task, PRODUCTS_PATH).await,
            Task::TopByCategory => {
                self.get(task, "/api/v1/task1/products/top_most_expensive_by_category/")
                    .await
            }
            Task::TopTen => {
                self.get(task, "/api/v1/task1/products/top_10_most_expensive/")
                    .await
            }
            Task::CategoryCounts => {
                self.get(task, "/api/v1/task1/products/products_with_category_counts/")
                    .await
            }
            Task::Pagination => self.follow_next_page().await,
        }
    }

    async fn get(&mut self, task: Task, path: &str) {
        let url = format!("{}{}", self.host, path);
        self.send(task, self.client.get(url), StatusCode::OK).await;
    }

    async fn create_user(&mut self) {
        let suffix = short_id();
        let payload = json!({
            "username": format!("user_{}", suffix),
            "email": format!("user_{}@example.com", suffix),
            "first_name": "Test",
            "last_name": "User",
            "profile": {"website": "https://example.com", "bio": LOAD_BIO}
        });
        let request = self
            .client
            .post(format!("{}{}", self.host, USERS_PATH))
            .json(&payload);

        if let Some(body) = self.send(Task::CreateUser, request, StatusCode::CREATED).await {
            self.user_id = body.get("id").and_then(Value::as_i64);
        }
    }

    async fn update_user(&mut self) {
        let Some(id) = self.user_id else {
            return;
        };
        let payload = json!({
            "email": format!("updated_{}@example.com", id),
            "profile": {"website": "https://updated.com", "bio": UPDATED_BIO}
        });
        let request = self
            .client
            .patch(format!("{}{}{}/", self.host, USERS_PATH, id))
            .json(&payload);

        self.send(Task::UpdateUser, request, StatusCode::OK).await;
    }

    async fn create_invalid_user(&mut self) {
        let payload = json!({
            "username": format!("user_{}", short_id()),
            "profile": {"website": "invalid-url", "bio": "Short"}
        });
        let request = self
            .client
            .post(format!("{}{}", self.host, USERS_PATH))
            .json(&payload);

        self.send(Task::CreateInvalidUser, request, StatusCode::BAD_REQUEST)
            .await;
    }

    async fn follow_next_page(&mut self) {
        let request = self.client.get(format!("{}{}", self.host, PRODUCTS_PATH));
        let Some(body) = self.send(Task::Pagination, request, StatusCode::OK).await else {
            return;
        };

        if let Some(next) = body.get("next").and_then(Value::as_str) {
            let request = self.client.get(next);
            self.send(Task::Pagination, request, StatusCode::OK).await;
        }
    }

    /// Send, time and record one request. Returns the JSON body when the
    /// status matched `expected`.
    async fn send(
        &mut self,
        task: Task,
        request: reqwest::RequestBuilder,
        expected: StatusCode,
    ) -> Option<Value> {
        let started = Instant::now();
        let result = request.send().await;

        let outcome = match result {
            Ok(response) if response.status() == expected => {
                Ok(response.json::<Value>().await.unwrap_or(Value::Null))
            }
            Ok(response) => {
                let status = response.status();
                let text = response.text().await.unwrap_or_default();
                Err(format!("unexpected status {}: {}", status, text))
            }
            Err(e) => Err(e.to_string()),
        };

        let success = outcome.is_ok();
        self.report.record(task.name(), success, started.elapsed());

        match outcome {
            Ok(body) => Some(body),
            Err(reason) => {
                debug!(task = task.name(), %reason, "Request failed");
                None
            }
        }
    }
}

fn short_id() -> String {
    uuid::Uuid::new_v4().simple().to_string()[..8].to_string()
}
