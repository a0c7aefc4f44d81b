mod log;

// Driven from the wasm frontend; the host build only tests them.
#[cfg_attr(not(target_arch = "wasm32"), allow(dead_code))]
mod config;
#[cfg_attr(not(target_arch = "wasm32"), allow(dead_code))]
mod coordinator;
#[cfg_attr(not(target_arch = "wasm32"), allow(dead_code))]
mod counter;
#[cfg_attr(not(target_arch = "wasm32"), allow(dead_code))]
mod effects;
#[cfg_attr(not(target_arch = "wasm32"), allow(dead_code))]
mod form;
#[cfg_attr(not(target_arch = "wasm32"), allow(dead_code))]
mod nav;
#[cfg_attr(not(target_arch = "wasm32"), allow(dead_code))]
mod particles;
#[cfg_attr(not(target_arch = "wasm32"), allow(dead_code))]
mod scroll;

#[cfg(target_arch = "wasm32")]
mod frontend;
#[cfg(not(target_arch = "wasm32"))]
mod server;

#[cfg(not(target_arch = "wasm32"))]
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    server::run().await
}

#[cfg(target_arch = "wasm32")]
fn main() {
    frontend::run();
}
