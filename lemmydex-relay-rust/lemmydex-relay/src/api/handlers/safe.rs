use crate::domain::error::RelayError;
use crate::infrastructure::safe::{SafeCall, SafeProposer, SafeSendRequest};
use actix_web::{post, web::Data, web::Json, HttpResponse};
use serde_json::json;
use std::sync::Arc;

/// Propose a call to the configured Safe. Returns 503 when no Safe is set up.
#[post("/safe-send")]
pub async fn safe_send(
    proposer: Option<Data<Arc<SafeProposer>>>,
    body: Json<SafeSendRequest>,
) -> Result<HttpResponse, RelayError> {
    let proposer = proposer.ok_or_else(|| {
        RelayError::NotConfigured("Safe sending is not configured (SAFE_ADDRESS / RELAYER_PK)".to_string())
    })?;
    let call = SafeCall::from_request(&body).map_err(|e| RelayError::InvalidInput(e.to_string()))?;

    tracing::info!(to = %body.to, "Safe send requested");
    let proposal = proposer
        .propose(call)
        .await
        .map_err(|e| RelayError::Upstream(e.to_string()))?;
    tracing::info!(link = %proposal.link, "Safe transaction proposed");

    Ok(HttpResponse::Ok().json(json!({
        "ok": true,
        "safeTxHash": proposal.safe_tx_hash,
        "sender": proposal.sender,
        "link": proposal.link,
    })))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::config::SafeConfig;
    use actix_web::{http::StatusCode, test, web, App};

    #[actix_web::test]
    async fn test_unconfigured_safe_is_503() {
        let app = test::init_service(App::new().service(web::scope("/api").service(safe_send))).await;
        let req = test::TestRequest::post()
            .uri("/api/safe-send")
            .set_json(json!({"to": "0x2791Bca1f2de4661ED88A30C99A7a9449Aa84174", "data": "0x"}))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::SERVICE_UNAVAILABLE);
        let body: serde_json::Value = test::read_body_json(resp).await;
        assert_eq!(body["ok"], false);
    }

    #[actix_web::test]
    async fn test_missing_parameters() {
        let config = SafeConfig {
            safe_address: Some("0x1234567890123456789012345678901234567890".to_string()),
            relayer_pk: Some("0xac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80".to_string()),
            ..SafeConfig::default()
        };
        let proposer = SafeProposer::new(&config, "https://polygon-rpc.com", 137).unwrap();
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(Arc::new(proposer)))
                .service(web::scope("/api").service(safe_send)),
        )
        .await;

        let req = test::TestRequest::post()
            .uri("/api/safe-send")
            .set_json(json!({"to": "0x2791Bca1f2de4661ED88A30C99A7a9449Aa84174"}))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let body: serde_json::Value = test::read_body_json(resp).await;
        assert_eq!(body["error"], "Missing parameters");
    }
}
