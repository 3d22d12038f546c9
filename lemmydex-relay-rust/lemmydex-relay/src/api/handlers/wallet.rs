use super::ServiceData;
use crate::domain::error::RelayError;
use actix_web::{get, post, web::Json, HttpResponse};
use lemmydex_swap_core::BalanceQuery;
use serde_json::json;

/// Native and ERC-20 balances of `wallet`. Rows that fail carry their own
/// `error`; the request still succeeds.
#[post("/balances")]
pub async fn balances(service: ServiceData, body: Json<BalanceQuery>) -> Result<HttpResponse, RelayError> {
    let query = body.into_inner();
    let sheet = service.read_balances(&query).await?;
    Ok(HttpResponse::Ok().json(json!({
        "ok": true,
        "wallet": query.wallet.trim(),
        "balances": sheet,
    })))
}

#[get("/tokens")]
pub async fn tokens(service: ServiceData) -> HttpResponse {
    HttpResponse::Ok().json(json!({
        "ok": true,
        "tokens": service.catalog().tokens(),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::handlers::test_support::{service, FakeChain, FakeTrade, USDC, WALLET};
    use actix_web::{http::StatusCode, test, web, App};
    use ethers::types::U256;
    use std::sync::Arc;

    #[actix_web::test]
    async fn test_balances_envelope() {
        let chain = FakeChain {
            balance: U256::from(1_500_000u64),
            ..FakeChain::default()
        };
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(service(chain, Arc::new(FakeTrade::default()))))
                .service(web::scope("/api").service(balances)),
        )
        .await;

        let req = test::TestRequest::post()
            .uri("/api/balances")
            .set_json(json!({"wallet": WALLET, "tokens": [USDC, "junk"]}))
            .to_request();
        let body: serde_json::Value = test::call_and_read_body_json(&app, req).await;

        assert_eq!(body["ok"], true);
        assert_eq!(body["wallet"], WALLET);
        assert_eq!(body["balances"]["USDC"]["formatted"], "1.5");
        assert_eq!(body["balances"]["USDC"]["raw"], "1500000");
        assert_eq!(body["balances"]["USDC"]["decimals"], 6);
        assert_eq!(body["balances"]["junk"]["error"], "invalid token");
    }

    #[actix_web::test]
    async fn test_balances_requires_wallet() {
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(service(FakeChain::default(), Arc::new(FakeTrade::default()))))
                .service(web::scope("/api").service(balances)),
        )
        .await;

        let req = test::TestRequest::post()
            .uri("/api/balances")
            .set_json(json!({"wallet": ""}))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let body: serde_json::Value = test::read_body_json(resp).await;
        assert_eq!(body["ok"], false);
    }

    #[actix_web::test]
    async fn test_token_catalog() {
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(service(FakeChain::default(), Arc::new(FakeTrade::default()))))
                .service(web::scope("/api").service(tokens)),
        )
        .await;

        let req = test::TestRequest::get().uri("/api/tokens").to_request();
        let body: serde_json::Value = test::call_and_read_body_json(&app, req).await;

        let listed = body["tokens"].as_array().unwrap();
        assert_eq!(listed.len(), 9);
        assert!(listed.iter().any(|t| t["symbol"] == "POL"));
    }
}
