//! Create a live-classroom room through the generic signed `post`.
//!
//! Reads `BAIJIAYUN_PARTNER_ID`, `BAIJIAYUN_SECRET_KEY` and
//! `BAIJIAYUN_PRIVATE_DOMAIN` from the environment.

use baijiayun_core::time::now_unix;
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

    let start = now_unix() + 3600;
    let params = Params::new()
        .with("partner_id", client.partner_id())
        .with("title", "Algebra 101")
        .with("start_time", start)
        .with("end_time", start + 2700)
        // 2 is a regular large class.
        .with("type", 2);

    let room = client.post("/openapi/room/create", params).await?;
    println!("created room: {room}");

    Ok(())
}
