//! Serial command console task
//!
//! Reads bytes from UART0, echoes them, and runs each completed line
//! against the shared sampler and display unit.

use defmt::*;
use embassy_rp::uart::{BufferedUartRx, BufferedUartTx};
use embedded_io_async::{Read, Write};
use heapless::String;

use envmon_core::console::{run_line, ConsoleContext, LineBuffer, LineEvent, BANNER, ERASE_SEQUENCE};

use crate::channels::{REFRESH, SAMPLER, UNIT};

/// Buffer size for UART receive
const RX_BUF_SIZE: usize = 64;

/// Largest response (the help text)
const RESPONSE_CAPACITY: usize = 1024;

/// Console task - line editing and command execution
#[embassy_executor::task]
pub async fn console_task(mut tx: BufferedUartTx, mut rx: BufferedUartRx) {
    info!("Console task started");

    send(&mut tx, BANNER.as_bytes()).await;

    let mut line = LineBuffer::new();
    let mut buf = [0u8; RX_BUF_SIZE];

    loop {
        match rx.read(&mut buf).await {
            Ok(n) if n > 0 => {
                for &byte in &buf[..n] {
                    match line.feed(byte) {
                        LineEvent::None => {}
                        LineEvent::Echo(b) => send(&mut tx, &[b]).await,
                        LineEvent::Erase => send(&mut tx, ERASE_SEQUENCE.as_bytes()).await,
                        LineEvent::Line(text) => {
                            send(&mut tx, b"\r\n").await;
                            execute(&mut tx, &text).await;
                        }
                    }
                }
            }
            Ok(_) => {}
            Err(e) => {
                warn!("UART read error: {:?}", e);
            }
        }
    }
}

/// Run one command line and send the response
async fn execute(tx: &mut BufferedUartTx, text: &str) {
    debug!("Console command: {=str}", text);

    let mut out: String<RESPONSE_CAPACITY> = String::new();
    {
        let mut sampler = SAMPLER.lock().await;
        let mut unit = UNIT.lock().await;
        let mut ctx = ConsoleContext {
            sampler: &mut *sampler,
            unit: &mut *unit,
        };
        if run_line(text, &mut ctx, &mut out).is_err() {
            warn!("Console response truncated");
        }
    }

    REFRESH.signal(());
    send(tx, out.as_bytes()).await;
}

async fn send(tx: &mut BufferedUartTx, bytes: &[u8]) {
    if let Err(e) = tx.write_all(bytes).await {
        warn!("UART write error: {:?}", e);
    }
}
