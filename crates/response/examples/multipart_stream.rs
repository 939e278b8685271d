//! Streams a `multipart/x-mixed-replace` response, one part per second.
//!
//! Run it and open `http://127.0.0.1:8080` with curl to watch parts arrive:
//!
//! ```text
//! curl -N http://127.0.0.1:8080/
//! ```

use std::time::Duration;

use micro_response::connection::{ChannelTransport, ConnectionWriter};
use micro_response::protocol::{HeaderFields, Part};
use micro_response::response::ResponseComposer;
use tokio::io::AsyncReadExt;
use tokio::net::{TcpListener, TcpStream};
use tokio::task::JoinHandle;
use tracing::{Level, error, info, warn};
use tracing_subscriber::FmtSubscriber;

const FRAMES: usize = 5;

#[tokio::main]
async fn main() {
    let subscriber = FmtSubscriber::builder().with_max_level(Level::DEBUG).finish();
    tracing::subscriber::set_global_default(subscriber).expect("setting default subscriber failed");

    info!(port = 8080, "start listening");
    let tcp_listener = match TcpListener::bind("127.0.0.1:8080").await {
        Ok(tcp_listener) => tcp_listener,
        Err(e) => {
            error!(cause = %e, "bind server error");
            return;
        }
    };

    loop {
        let (tcp_stream, remote_addr) = match tcp_listener.accept().await {
            Ok(stream_and_addr) => stream_and_addr,
            Err(e) => {
                warn!(cause = %e, "failed to accept");
                continue;
            }
        };

        info!(%remote_addr, "accepted connection");
        tokio::spawn(serve(tcp_stream));
    }
}

async fn serve(mut tcp_stream: TcpStream) {
    // the request itself is not interpreted here
    let mut request = [0u8; 4096];
    if let Err(e) = tcp_stream.read(&mut request).await {
        warn!(cause = %e, "failed to read request");
        return;
    }

    let (transport, events) = ChannelTransport::channel();
    let writer_task = tokio::spawn(async move {
        let mut writer = ConnectionWriter::with_capacity(tcp_stream, 1024);
        if let Err(e) = writer.run(events).await {
            error!("write response error, cause {}", e);
        }
    });

    let mut response = ResponseComposer::new(transport);
    for frame in 0..FRAMES {
        let headers: HeaderFields = [("Content-Type", "text/plain")].into_iter().collect();
        response.multipart(Part::new(headers, format!("frame {frame}\r\n")));
        if let Err(e) = response.send_multiparts() {
            error!(cause = %e, "send multipart error");
            response.abort();
            drop(response);
            join_writer(writer_task).await;
            return;
        }
        tokio::time::sleep(Duration::from_secs(1)).await;
    }

    if let Err(e) = response.send_trailer() {
        error!(cause = %e, "send trailer error");
    }
    drop(response);
    join_writer(writer_task).await;
}

async fn join_writer(writer_task: JoinHandle<()>) {
    if let Err(e) = writer_task.await {
        error!(cause = %e, "connection writer task failed");
    }
}
