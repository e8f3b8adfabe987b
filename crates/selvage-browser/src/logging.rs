//! Console logging for the editor.

use tracing::Level;

/// Install the panic hook and a console `tracing` subscriber.
///
/// Safe to call more than once; only the first subscriber is kept.
pub fn init_tracing(level: Level) {
    #[cfg(all(target_arch = "wasm32", target_os = "unknown"))]
    {
        use tracing::subscriber::set_global_default;
        use tracing_subscriber::Registry;
        use tracing_subscriber::layer::SubscriberExt;

        console_error_panic_hook::set_once();

        let wasm_layer = tracing_wasm::WASMLayer::new(
            tracing_wasm::WASMLayerConfigBuilder::new()
                .set_max_level(level)
                .build(),
        );
        let _ = set_global_default(Registry::default().with(wasm_layer));
    }

    #[cfg(not(all(target_arch = "wasm32", target_os = "unknown")))]
    let _ = level;
}
