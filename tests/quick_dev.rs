//! Manual smoke script against a locally running server:
//!
//! ```sh
//! cargo run
//! cargo test --test quick_dev -- --ignored --nocapture
//! ```

use anyhow::Result;

#[tokio::test]
#[ignore]
async fn quick_dev() -> Result<()> {
    let hc = httpc_test::new_client("http://localhost:8080")?;

    hc.do_get("/healthz").await?.print().await?;

    hc.do_get("/api/charts?genre=all&limit=5").await?.print().await?;

    hc.do_get("/api/winners").await?.print().await?;

    // Admission denial without a valid token pair shows the error shape.
    hc.do_post(
        "/api/tracks/nonexistent/vote",
        serde_json::json!({ "score": 7 }),
    )
    .await?
    .print()
    .await?;

    Ok(())
}
