//! Registration and login

use crate::error::HarnessResult;
use crate::http::{HttpClient, HttpMethod};
use crate::response_shape::ResponseShape;
use crate::session::SessionContext;
use crate::step::{Criticality, Services, Step, StepId};

use async_trait::async_trait;
use serde_json::{json, Value};
use std::time::Duration;

const TOKEN_PREVIEW_CHARS: usize = 20;

/// Post the session credentials to `path` and store the returned token.
async fn authenticate(
    ctx: &mut SessionContext,
    services: &Services,
    path: &str,
    expected_status: u16,
    timeout: Duration,
) -> HarnessResult<Value> {
    let credentials = ctx.credentials();
    let body = json!({
        "email": credentials.email,
        "password": credentials.password,
    });

    let outcome = services
        .http
        .call(
            HttpMethod::Post,
            &services.backend_url(path),
            Some(&body),
            &HttpClient::json_headers(),
            timeout,
        )
        .await;
    let json = outcome.expect_json(expected_status)?;
    let token = ResponseShape::non_empty_str(json, "/data/token")?.to_string();

    let preview: String = token.chars().take(TOKEN_PREVIEW_CHARS).collect();
    ctx.set_token(token);

    Ok(json!({
        "user": ctx.user_identity(),
        "token_preview": format!("{preview}..."),
    }))
}

/// `POST /auth/register`, expecting 201 and `data.token`
#[derive(Debug, Clone, Default)]
pub struct Register;

#[async_trait]
impl Step for Register {
    fn id(&self) -> StepId {
        StepId::Register
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
        authenticate(ctx, services, "/auth/register", 201, timeout).await
    }
}

/// `POST /auth/login`, expecting 200 and `data.token`; overwrites the token
#[derive(Debug, Clone, Default)]
pub struct Login;

#[async_trait]
impl Step for Login {
    fn id(&self) -> StepId {
        StepId::Login
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
        authenticate(ctx, services, "/auth/login", 200, timeout).await
    }
}
