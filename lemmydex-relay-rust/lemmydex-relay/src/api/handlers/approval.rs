use super::ServiceData;
use crate::domain::error::RelayError;
use actix_web::{post, web::Json, HttpResponse};
use lemmydex_swap_core::shared::utils::format_units;
use lemmydex_swap_core::{AllowanceQuery, ApprovalCheckRequest, CheckOrApproveRequest};
use serde::Deserialize;
use serde_json::json;

pub const APPROVE_NOTE: &str = "Sign and execute this transaction from your wallet or Safe. It grants a MaxUint256 allowance.";

#[derive(Debug, Default, Deserialize)]
pub struct ApproveRequest {
    #[serde(default)]
    pub token: String,
    #[serde(default)]
    pub spender: Option<String>,
}

/// Current allowance of `owner` towards `spender` against a human amount.
#[post("/allowance")]
pub async fn allowance(service: ServiceData, body: Json<AllowanceQuery>) -> Result<HttpResponse, RelayError> {
    let query = body.into_inner();
    let state = service.check_allowance(&query).await?;
    Ok(HttpResponse::Ok().json(json!({
        "ok": true,
        "token": state.token,
        "owner": state.owner,
        "spender": state.spender,
        "decimals": state.decimals,
        "allowance": state.current.to_string(),
        "allowanceFormatted": format_units(state.current, state.decimals)?,
        "required": state.required.to_string(),
        "requiredFormatted": query.amount.trim(),
        "enough": state.sufficient,
    })))
}

#[post("/approve")]
pub async fn approve(service: ServiceData, body: Json<ApproveRequest>) -> Result<HttpResponse, RelayError> {
    let built = service.build_approval(&body.token, body.spender.as_deref())?;
    Ok(HttpResponse::Ok().json(json!({
        "ok": true,
        "tx": built.tx,
        "spender": built.spender,
        "note": APPROVE_NOTE,
    })))
}

/// Straight passthrough to the Trade API approval check.
#[post("/approval")]
pub async fn approval(service: ServiceData, body: Json<ApprovalCheckRequest>) -> Result<HttpResponse, RelayError> {
    let check = service.inspect_approval(&body).await?;
    Ok(HttpResponse::Ok().json(json!({
        "ok": true,
        "approval": check.approval,
        "cancel": check.cancel,
    })))
}

#[post("/check-or-approve")]
pub async fn check_or_approve(
    service: ServiceData,
    body: Json<CheckOrApproveRequest>,
) -> Result<HttpResponse, RelayError> {
    let decision = service.run_check_or_approve(&body).await?;
    Ok(HttpResponse::Ok().json(json!({
        "ok": true,
        "approved": decision.approved,
        "tx": decision.tx,
        "spender": decision.spender,
    })))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::handlers::test_support::{service, FakeChain, FakeTrade, USDC, WALLET};
    use actix_web::{http::StatusCode, test, web, App};
    use ethers::types::U256;
    use lemmydex_swap_core::SwapError;
    use std::sync::Arc;

    const PERMIT2: &str = "0x000000000022D473030F116dDEE9F6B43aC78BA3";

    macro_rules! app {
        ($chain:expr, $trade:expr) => {
            test::init_service(
                App::new()
                    .app_data(web::Data::new(service($chain, Arc::new($trade))))
                    .service(
                        web::scope("/api")
                            .service(allowance)
                            .service(approve)
                            .service(approval)
                            .service(check_or_approve),
                    ),
            )
            .await
        };
    }

    #[actix_web::test]
    async fn test_allowance_exactly_enough() {
        let chain = FakeChain {
            allowance: U256::from(2_500_000u64),
            ..FakeChain::default()
        };
        let app = app!(chain, FakeTrade::default());

        let req = test::TestRequest::post()
            .uri("/api/allowance")
            .set_json(json!({"token": USDC, "owner": WALLET, "amount": "2.5"}))
            .to_request();
        let body: serde_json::Value = test::call_and_read_body_json(&app, req).await;

        assert_eq!(body["ok"], true);
        assert_eq!(body["spender"], PERMIT2);
        assert_eq!(body["decimals"], 6);
        assert_eq!(body["allowance"], "2500000");
        assert_eq!(body["allowanceFormatted"], "2.5");
        assert_eq!(body["required"], "2500000");
        assert_eq!(body["requiredFormatted"], "2.5");
        assert_eq!(body["enough"], true);
    }

    #[actix_web::test]
    async fn test_allowance_decimals_failure_is_hard() {
        let chain = FakeChain {
            decimals: Err(SwapError::chain_read("execution reverted")),
            ..FakeChain::default()
        };
        let app = app!(chain, FakeTrade::default());

        let req = test::TestRequest::post()
            .uri("/api/allowance")
            .set_json(json!({"token": USDC, "owner": WALLET, "amount": "1"}))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_GATEWAY);
    }

    #[actix_web::test]
    async fn test_approve_defaults_to_permit2() {
        let app = app!(FakeChain::default(), FakeTrade::default());

        let req = test::TestRequest::post()
            .uri("/api/approve")
            .set_json(json!({"token": USDC}))
            .to_request();
        let body: serde_json::Value = test::call_and_read_body_json(&app, req).await;

        assert_eq!(body["spender"], PERMIT2);
        assert_eq!(body["tx"]["to"], USDC);
        assert_eq!(body["tx"]["value"], "0x0");
        assert_eq!(body["tx"]["chainId"], 137);
        assert!(body["tx"]["data"].as_str().unwrap().starts_with("0x095ea7b3"));
        assert_eq!(body["note"], APPROVE_NOTE);
    }

    #[actix_web::test]
    async fn test_approve_requires_token() {
        let app = app!(FakeChain::default(), FakeTrade::default());
        let req = test::TestRequest::post().uri("/api/approve").set_json(json!({})).to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let body: serde_json::Value = test::read_body_json(resp).await;
        assert_eq!(body["error"], "token is required");
    }

    #[actix_web::test]
    async fn test_approval_passthrough() {
        let trade = FakeTrade {
            check_approval: Ok(json!({"requestId": "r", "approval": null, "cancel": null})),
            ..FakeTrade::default()
        };
        let app = app!(FakeChain::default(), trade);

        let req = test::TestRequest::post()
            .uri("/api/approval")
            .set_json(json!({"walletAddress": WALLET, "token": USDC, "amount": "1000"}))
            .to_request();
        let body: serde_json::Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body, json!({"ok": true, "approval": null, "cancel": null}));
    }

    #[actix_web::test]
    async fn test_check_or_approve_already_approved() {
        let trade = FakeTrade {
            check_approval: Ok(json!({"approval": null})),
            ..FakeTrade::default()
        };
        let app = app!(FakeChain::default(), trade);

        let req = test::TestRequest::post()
            .uri("/api/check-or-approve")
            .set_json(json!({"walletAddress": WALLET, "token": USDC, "amount": "100000"}))
            .to_request();
        let body: serde_json::Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["approved"], true);
        assert!(body["tx"].is_null());
    }

    #[actix_web::test]
    async fn test_check_or_approve_falls_back_on_upstream_error() {
        let app = app!(FakeChain::default(), FakeTrade::default());

        let req = test::TestRequest::post()
            .uri("/api/check-or-approve")
            .set_json(json!({"walletAddress": WALLET, "token": USDC, "amount": "100000"}))
            .to_request();
        let body: serde_json::Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["approved"], false);
        assert_eq!(body["spender"], PERMIT2);
        assert_eq!(body["tx"]["to"], USDC);
    }
}
