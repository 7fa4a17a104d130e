//! Health record CRUD steps
//!
//! All of these require the session token; everything after creation also
//! requires the id the create step stored.

use crate::error::{HarnessError, HarnessResult};
use crate::http::{HttpClient, HttpMethod};
use crate::response_shape::ResponseShape;
use crate::session::SessionContext;
use crate::step::{Criticality, Services, Step, StepId};

use async_trait::async_trait;
use chrono::Local;
use serde_json::{json, Value};
use std::time::Duration;

/// Payloads the workflow sends, and the severities it expects back.
pub struct RecordFixture;

impl RecordFixture {
    pub const INITIAL_SEVERITY: i64 = 8;
    pub const UPDATED_SEVERITY: i64 = 6;

    pub fn create_payload() -> Value {
        let now = Local::now();
        json!({
            "record_date": now.format("%Y-%m-%d").to_string(),
            "record_time": now.format("%H:%M").to_string(),
            "site": "chest",
            "onset": "sudden, 2 hours ago",
            "character": "sharp, stabbing pain",
            "radiation": "left arm",
            "associations": "shortness of breath, sweating",
            "time_course": "constant, getting worse",
            "exacerbating_factors": "movement, deep breathing",
            "severity": Self::INITIAL_SEVERITY,
            "palliating_factors": "rest",
            "symptoms": "chest pain, difficulty breathing, nausea",
            "medications": "aspirin 81mg",
            "vital_signs": {
                "blood_pressure": "160/95",
                "pulse": "110",
                "temperature": "98.6"
            },
            "personal_notes": "Very concerned about these symptoms"
        })
    }

    pub fn update_payload() -> Value {
        let now = Local::now();
        json!({
            "record_date": now.format("%Y-%m-%d").to_string(),
            "record_time": now.format("%H:%M").to_string(),
            "site": "chest",
            "severity": Self::UPDATED_SEVERITY,
            "symptoms": "chest pain improving with rest",
            "personal_notes": "Symptoms improving after taking aspirin"
        })
    }
}

fn record_path(id: &str) -> String {
    format!("/health-records/{id}")
}

/// `POST /health-records`, expecting 201 and `data.id`
#[derive(Debug, Clone, Default)]
pub struct CreateRecord;

#[async_trait]
impl Step for CreateRecord {
    fn id(&self) -> StepId {
        StepId::CreateRecord
    }

    fn criticality(&self) -> Criticality {
        Criticality::Required
    }

    async fn execute(
        &self,
        ctx: &mut SessionContext,
        services: &Services,
        timeout: Duration,
    ) -> HarnessResult<Value> {
        let headers = HttpClient::bearer_headers(ctx.require_token()?)?;
        let outcome = services
            .http
            .call(
                HttpMethod::Post,
                &services.backend_url("/health-records"),
                Some(&RecordFixture::create_payload()),
                &headers,
                timeout,
            )
            .await;
        let json = outcome.expect_json(201)?;
        let id = ResponseShape::identifier(json, "/data/id")?;

        ctx.set_resource_id(id.clone());
        Ok(json!({ "id": id }))
    }
}

/// `GET /health-records`, expecting 200 and a non-empty `data` array
#[derive(Debug, Clone, Default)]
pub struct ListRecords;

#[async_trait]
impl Step for ListRecords {
    fn id(&self) -> StepId {
        StepId::ListRecords
    }

    fn criticality(&self) -> Criticality {
        Criticality::Required
    }

    async fn execute(
        &self,
        ctx: &mut SessionContext,
        services: &Services,
        timeout: Duration,
    ) -> HarnessResult<Value> {
        let headers = HttpClient::bearer_headers(ctx.require_token()?)?;
        let outcome = services
            .http
            .call(
                HttpMethod::Get,
                &services.backend_url("/health-records"),
                None,
                &headers,
                timeout,
            )
            .await;
        let json = outcome.expect_json(200)?;
        let records = ResponseShape::array(json, "/data")?;
        if records.is_empty() {
            return Err(HarnessError::malformed_body(
                "record list is empty after creating a record",
            ));
        }

        Ok(json!({ "count": records.len() }))
    }
}

/// `GET /health-records/{id}`, expecting 200 and the given severity
///
/// Declared twice in the full workflow: after creation and after the update.
#[derive(Debug, Clone)]
pub struct GetRecord {
    pub step: StepId,
    pub expected_severity: i64,
}

impl GetRecord {
    pub fn after_create() -> Self {
        Self {
            step: StepId::GetRecord,
            expected_severity: RecordFixture::INITIAL_SEVERITY,
        }
    }

    pub fn after_update() -> Self {
        Self {
            step: StepId::VerifyUpdatedRecord,
            expected_severity: RecordFixture::UPDATED_SEVERITY,
        }
    }
}

#[async_trait]
impl Step for GetRecord {
    fn id(&self) -> StepId {
        self.step
    }

    fn criticality(&self) -> Criticality {
        Criticality::Required
    }

    async fn execute(
        &self,
        ctx: &mut SessionContext,
        services: &Services,
        timeout: Duration,
    ) -> HarnessResult<Value> {
        let headers = HttpClient::bearer_headers(ctx.require_token()?)?;
        let id = ctx.require_resource_id()?;
        let outcome = services
            .http
            .call(
                HttpMethod::Get,
                &services.backend_url(&record_path(id)),
                None,
                &headers,
                timeout,
            )
            .await;
        let json = outcome.expect_json(200)?;
        ResponseShape::object(json, "/data")?;
        ResponseShape::expect_integer(json, "/data/severity", self.expected_severity)?;

        Ok(json!({ "id": id, "severity": self.expected_severity }))
    }
}

/// `PUT /health-records/{id}` with a partial record, expecting 200
#[derive(Debug, Clone, Default)]
pub struct UpdateRecord;

#[async_trait]
impl Step for UpdateRecord {
    fn id(&self) -> StepId {
        StepId::UpdateRecord
    }

    fn criticality(&self) -> Criticality {
        Criticality::Required
    }

    async fn execute(
        &self,
        ctx: &mut SessionContext,
        services: &Services,
        timeout: Duration,
    ) -> HarnessResult<Value> {
        let headers = HttpClient::bearer_headers(ctx.require_token()?)?;
        let id = ctx.require_resource_id()?;
        let outcome = services
            .http
            .call(
                HttpMethod::Put,
                &services.backend_url(&record_path(id)),
                Some(&RecordFixture::update_payload()),
                &headers,
                timeout,
            )
            .await;
        outcome.expect_status(200)?;

        // The backend echoes the updated record; older builds answer with
        // only a message.
        if let Some(json) = outcome.json() {
            if json.pointer("/data/severity").is_some_and(|v| !v.is_null()) {
                ResponseShape::expect_integer(
                    json,
                    "/data/severity",
                    RecordFixture::UPDATED_SEVERITY,
                )?;
            }
        }

        Ok(json!({ "id": id, "severity": RecordFixture::UPDATED_SEVERITY }))
    }
}

/// `DELETE /health-records/{id}`, expecting 200; retires the session id
#[derive(Debug, Clone, Default)]
pub struct DeleteRecord;

#[async_trait]
impl Step for DeleteRecord {
    fn id(&self) -> StepId {
        StepId::DeleteRecord
    }

    fn criticality(&self) -> Criticality {
        Criticality::Required
    }

    async fn execute(
        &self,
        ctx: &mut SessionContext,
        services: &Services,
        timeout: Duration,
    ) -> HarnessResult<Value> {
        let headers = HttpClient::bearer_headers(ctx.require_token()?)?;
        let id = ctx.require_resource_id()?.to_string();
        let outcome = services
            .http
            .call(
                HttpMethod::Delete,
                &services.backend_url(&record_path(&id)),
                None,
                &headers,
                timeout,
            )
            .await;
        outcome.expect_status(200)?;

        ctx.retire_resource_id();
        Ok(json!({ "deleted_id": id }))
    }
}

/// `GET /health-records/{id}` on the deleted id, expecting 404
#[derive(Debug, Clone, Default)]
pub struct VerifyRecordDeleted;

#[async_trait]
impl Step for VerifyRecordDeleted {
    fn id(&self) -> StepId {
        StepId::VerifyRecordDeleted
    }

    fn criticality(&self) -> Criticality {
        Criticality::Required
    }

    async fn execute(
        &self,
        ctx: &mut SessionContext,
        services: &Services,
        timeout: Duration,
    ) -> HarnessResult<Value> {
        let headers = HttpClient::bearer_headers(ctx.require_token()?)?;
        let id = ctx.require_retired_resource_id()?;
        let outcome = services
            .http
            .call(
                HttpMethod::Get,
                &services.backend_url(&record_path(id)),
                None,
                &headers,
                timeout,
            )
            .await;
        outcome.expect_status(404)?;

        Ok(json!({ "id": id, "status": 404 }))
    }
}
