//! WebSocket control channel
//!
//! One socket is one control connection: it issues commands and receives the
//! events of every job it started. Closing it ends those jobs.

use crate::core::Orchestrator;
use crate::core::reporter::{ChannelSink, EventSink};
use crate::server::protocol::{ControlReply, handle_command};
use crate::server::state::AppState;
use actix_web::{Error, HttpRequest, HttpResponse, web};
use actix_ws::{Message, MessageStream, Session};
use futures::StreamExt;
use serde::Serialize;
use std::sync::Arc;
use tracing::{debug, error, info, warn};
use uuid::Uuid;

/// GET /ws - open a control connection
pub async fn control_socket(
    req: HttpRequest,
    stream: web::Payload,
    state: web::Data<AppState>,
) -> Result<HttpResponse, Error> {
    let (response, session, msg_stream) = actix_ws::handle(&req, stream)?;

    let connection = Uuid::new_v4().simple().to_string();
    info!("Control connection {} opened", connection);

    let orchestrator = state.orchestrator.clone();
    actix_web::rt::spawn(run_session(connection, orchestrator, session, msg_stream));

    Ok(response)
}

async fn send_json<T: Serialize>(session: &mut Session, message: &T) -> Result<(), ()> {
    let json = serde_json::to_string(message).map_err(|e| {
        error!("Failed to serialise outbound message: {}", e);
    })?;
    session.text(json).await.map_err(|_| ())
}

async fn run_session(
    connection: String,
    orchestrator: Arc<Orchestrator>,
    mut session: Session,
    mut msg_stream: MessageStream,
) {
    let (sink, mut events) = ChannelSink::channel();
    let sink: Arc<dyn EventSink> = Arc::new(sink);

    loop {
        tokio::select! {
            event = events.recv() => {
                let Some(event) = event else {
                    break;
                };
                if send_json(&mut session, &event).await.is_err() {
                    break;
                }
            }

            msg = msg_stream.next() => {
                match msg {
                    Some(Ok(Message::Text(text))) => {
                        let reply = handle_command(&orchestrator, &connection, sink.clone(), &text);
                        if send_json(&mut session, &reply).await.is_err() {
                            break;
                        }
                    }
                    Some(Ok(Message::Ping(bytes))) => {
                        if session.pong(&bytes).await.is_err() {
                            break;
                        }
                    }
                    Some(Ok(Message::Binary(_))) => {
                        let reply = ControlReply::CommandError {
                            message: "Binary frames are not supported".to_string(),
                        };
                        if send_json(&mut session, &reply).await.is_err() {
                            break;
                        }
                    }
                    Some(Ok(Message::Close(reason))) => {
                        debug!("Connection {} closed by client: {:?}", connection, reason);
                        let _ = session.close(reason).await;
                        break;
                    }
                    Some(Ok(_)) => {}
                    Some(Err(e)) => {
                        warn!("Connection {} protocol error: {}", connection, e);
                        break;
                    }
                    None => break,
                }
            }
        }
    }

    let ended = orchestrator.end_connection(&connection);
    info!(
        "Control connection {} closed, {} job(s) ended",
        connection, ended
    );
}
