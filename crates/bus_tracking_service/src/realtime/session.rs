/*  Copyright 2022-23, Juspay India Pvt Ltd
    This program is free software: you can redistribute it and/or modify it under the terms of the GNU Affero General Public License
    as published by the Free Software Foundation, either version 3 of the License, or (at your option) any later version. This program
    is distributed in the hope that it will be useful, but WITHOUT ANY WARRANTY; without even the implied warranty of MERCHANTABILITY
    or FITNESS FOR A PARTICULAR PURPOSE. See the GNU Affero General Public License for more details. You should have received a copy of
    the GNU Affero General Public License along with this program. If not, see <https://www.gnu.org/licenses/>.
*/
use crate::common::types::*;
use crate::realtime::channel::{ChannelManager, StreamEvent};
use actix_web::{web::Bytes, HttpResponse};
use futures::StreamExt;
use serde_json::json;
use std::convert::Infallible;
use std::sync::Arc;
use tokio_stream::wrappers::ReceiverStream;

impl StreamEvent {
    fn to_frame(&self) -> Bytes {
        Bytes::from(format!("event: {}\ndata: {}\n\n", self.event, self.payload))
    }
}

/// Removes the connection from every group once the client drops the
/// response stream.
struct ConnectionGuard {
    connection_id: ConnectionId,
    channels: Arc<ChannelManager>,
}

impl Drop for ConnectionGuard {
    fn drop(&mut self) {
        self.channels.unregister(&self.connection_id);
    }
}

/// Opens the event stream for an admitted identity. The first frame
/// carries the connection id the client needs for subscription control.
pub fn sse_stream_response(channels: Arc<ChannelManager>, identity: &AuthIdentity) -> HttpResponse {
    let (connection_id, receiver) = channels.register(identity);

    let connected = StreamEvent {
        event: "connected".to_string(),
        payload: json!({ "connectionId": connection_id.to_owned() }),
    };

    let guard = ConnectionGuard {
        connection_id,
        channels,
    };

    let frames = futures::stream::once(futures::future::ready(connected))
        .chain(ReceiverStream::new(receiver))
        .map(move |event| {
            let _ = &guard;
            Ok::<Bytes, Infallible>(event.to_frame())
        });

    HttpResponse::Ok()
        .insert_header(("content-type", "text/event-stream"))
        .insert_header(("cache-control", "no-cache"))
        .streaming(frames)
}
