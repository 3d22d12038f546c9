use super::ServiceData;
use crate::domain::error::RelayError;
use crate::infrastructure::logger::Logger;
use actix_web::{post, web::Json, HttpResponse};
use lemmydex_swap_core::{QuoteParams, SwapParams};
use serde_json::json;

#[post("/quote")]
pub async fn quote(service: ServiceData, body: Json<QuoteParams>) -> Result<HttpResponse, RelayError> {
    let params = body.into_inner();
    Logger::quote_requested(&params.sell_token, &params.buy_token, &params.amount);

    let outcome = service.fetch_quote(&params).await.map_err(|e| {
        Logger::upstream_failed("quote", &e.to_string());
        e
    })?;
    Ok(HttpResponse::Ok().json(json!({
        "ok": true,
        "quote": outcome.quote,
        "formattedAmountOut": outcome.formatted_amount_out,
    })))
}

/// Exchange a quote for the transaction the wallet has to execute.
#[post("/swap")]
pub async fn swap(service: ServiceData, body: Json<SwapParams>) -> Result<HttpResponse, RelayError> {
    let tx = service.submit_swap(body.into_inner()).await?;
    Logger::swap_prepared(&tx.to, tx.chain_id);
    Ok(HttpResponse::Ok().json(json!({
        "ok": true,
        "swap": tx,
    })))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::handlers::test_support::{service, FakeChain, FakeTrade, USDC, WALLET, WETH};
    use actix_web::{http::StatusCode, test, web, App};
    use lemmydex_swap_core::SwapError;
    use std::sync::Arc;

    async fn post(trade: Arc<FakeTrade>, uri: &str, payload: serde_json::Value) -> (StatusCode, serde_json::Value) {
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(service(FakeChain::default(), trade)))
                .service(web::scope("/api").service(quote).service(swap)),
        )
        .await;
        let req = test::TestRequest::post().uri(uri).set_json(payload).to_request();
        let resp = test::call_service(&app, req).await;
        let status = resp.status();
        (status, test::read_body_json(resp).await)
    }

    #[actix_web::test]
    async fn test_quote_converts_with_sell_precision() {
        let trade = Arc::new(FakeTrade {
            quote: Ok(json!({"routing": "CLASSIC", "quote": {"quoteId": "q-7", "buyAmountDecimal": "0.05"}})),
            ..FakeTrade::default()
        });
        let (status, body) = post(
            Arc::clone(&trade),
            "/api/quote",
            json!({"sellToken": USDC, "buyToken": WETH, "amount": "0.1", "swapper": WALLET}),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["formattedAmountOut"], "0.05");
        assert_eq!(body["quote"]["quoteId"], "q-7");
        let sent = trade.last_quote.lock().unwrap().clone().unwrap();
        assert_eq!(sent.amount, "100000");
    }

    #[actix_web::test]
    async fn test_quote_rejects_empty_swapper_before_upstream() {
        let trade = Arc::new(FakeTrade::default());
        let (status, body) = post(
            Arc::clone(&trade),
            "/api/quote",
            json!({"sellToken": USDC, "buyToken": WETH, "amount": "0.1", "swapper": ""}),
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "swapper is required");
        assert!(trade.last_quote.lock().unwrap().is_none());
    }

    #[actix_web::test]
    async fn test_quote_surfaces_upstream_detail() {
        let trade = Arc::new(FakeTrade {
            quote: Err(SwapError::upstream("/quote", "No quotes available")),
            ..FakeTrade::default()
        });
        let (status, body) = post(
            trade,
            "/api/quote",
            json!({"sellToken": USDC, "buyToken": WETH, "amount": 5, "swapper": WALLET}),
        )
        .await;

        assert_eq!(status, StatusCode::BAD_GATEWAY);
        assert_eq!(body, json!({"ok": false, "error": "/quote failed: No quotes available"}));
    }

    #[actix_web::test]
    async fn test_swap_normalizes_transaction() {
        let trade = Arc::new(FakeTrade {
            swap: Ok(json!({"swap": {"to": WETH, "data": "0xabcdef", "value": "0x01"}})),
            ..FakeTrade::default()
        });
        let (status, body) = post(trade, "/api/swap", json!({"quote": {"quoteId": "q"}, "swapper": WALLET})).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            body["swap"],
            json!({"to": WETH, "data": "0xabcdef", "value": "0x01", "chainId": 137})
        );
    }

    #[actix_web::test]
    async fn test_swap_without_executable_shape() {
        let trade = Arc::new(FakeTrade {
            swap: Ok(json!({"requestId": "r"})),
            ..FakeTrade::default()
        });
        let (status, body) = post(trade, "/api/swap", json!({"quote": {"quoteId": "q"}, "swapper": WALLET})).await;

        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(body["ok"], false);
    }

    #[actix_web::test]
    async fn test_swap_requires_quote() {
        let (status, body) = post(Arc::new(FakeTrade::default()), "/api/swap", json!({"swapper": WALLET})).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "quote is required");
    }
}
