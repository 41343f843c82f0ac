//! Component lifecycle end to end: mount with a cleanup, concurrent update
//! producers, waiting for the queue to drain, unmount.

use std::sync::Arc;

use anyhow::Result;

use lifecell::{CleanupFn, Component};

#[tokio::main(flavor = "multi_thread")]
async fn main() -> Result<()> {
    let component = Arc::new(
        Component::builder("newsletter-form")
            .on_mount(|| {
                println!("[mount] subscribed to feed");
                Ok(Some(Box::new(|| {
                    println!("[cleanup] unsubscribed from feed");
                }) as CleanupFn))
            })
            .before_update(|| println!("[before-update]"))
            .after_update(|| println!("[after-update]"))
            .build(),
    );

    component.mount()?;
    // Second mount is a no-op: the hook does not run again.
    component.mount()?;

    let mut producers = Vec::new();
    for producer in 0..3 {
        let component = Arc::clone(&component);
        producers.push(tokio::spawn(async move {
            component.update().await.expect("component unmounted");
            println!("[producer {producer}] update queued");
        }));
    }
    for producer in producers {
        producer.await?;
    }

    component.tick().await;
    println!("updates processed: {}", component.update_count());

    component.unmount();
    Ok(())
}
