//! Verify an inbound webhook payload.
//!
//! The payload would normally come from the platform's callback request;
//! here one is signed locally first so the example runs end to end.

use baijiayun_core::{Context, OsEnv, Result};
use baijiayun_http_send_reqwest::ReqwestHttpSend;
use baijiayun_openapi::{Client, Config, Params};

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::init();

    let ctx = Context::new()
        .with_http_send(ReqwestHttpSend::default())
        .with_env(OsEnv);
    let config = Config::new().from_env(&ctx);
    let client = Client::new(ctx, config)?;

    let mut payload = Params::new()
        .with("room_id", 17110288405286_i64)
        .with("event", "class_start");
    client.authenticator().sign_params(&mut payload).await?;

    let trusted = client.verify_callback(&payload).await?;
    println!("payload trusted: {trusted}");

    let mut tampered = payload.clone();
    tampered.insert("event", "class_end");
    let trusted = client.verify_callback(&tampered).await?;
    println!("tampered payload trusted: {trusted}");

    Ok(())
}
