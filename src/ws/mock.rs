//! Scripted transport for unit tests.

use std::collections::{HashMap, VecDeque};
use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use serde_json::{Value, json};

use super::connection::CLIENT_IDENTITY;
use super::frame::Frame;
use super::messages::{REQUEST_KEY, RESPONSE_KEY, TEXT_PLAIN_FORMAT};
use super::reassembler::FrameSource;
use super::transport::Transport;
use crate::error::AlthermaError;

type Responder = Box<dyn FnMut(&Value) -> Vec<Frame> + Send>;

/// Answers every sent request through a closure. Reads with nothing
/// queued never complete.
pub(crate) struct ScriptedTransport {
    queued: VecDeque<Frame>,
    responder: Responder,
    sent: Arc<Mutex<Vec<Value>>>,
    closed: Arc<AtomicBool>,
}

impl fmt::Debug for ScriptedTransport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ScriptedTransport")
            .field("queued", &self.queued.len())
            .finish_non_exhaustive()
    }
}

impl ScriptedTransport {
    pub(crate) fn new(responder: impl FnMut(&Value) -> Vec<Frame> + Send + 'static) -> Self {
        Self {
            queued: VecDeque::new(),
            responder: Box::new(responder),
            sent: Arc::new(Mutex::new(Vec::new())),
            closed: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Never answers.
    pub(crate) fn silent() -> Self {
        Self::new(|_| Vec::new())
    }

    /// Every request sent so far, decoded.
    pub(crate) fn sent_log(&self) -> Arc<Mutex<Vec<Value>>> {
        Arc::clone(&self.sent)
    }

    pub(crate) fn closed_flag(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.closed)
    }
}

impl FrameSource for ScriptedTransport {
    async fn next_frame(&mut self) -> Result<Option<Frame>, AlthermaError> {
        match self.queued.pop_front() {
            Some(frame) => Ok(Some(frame)),
            None => std::future::pending().await,
        }
    }
}

impl Transport for ScriptedTransport {
    async fn open(_url: &str) -> Result<Self, AlthermaError> {
        Ok(Self::silent())
    }

    async fn send_text(&mut self, text: String) -> Result<(), AlthermaError> {
        let request: Value = serde_json::from_str(&text)
            .map_err(|e| AlthermaError::EnvelopeEncoding(e.to_string()))?;
        let frames = (self.responder)(&request);
        self.queued.extend(frames);
        if let Ok(mut sent) = self.sent.lock() {
            sent.push(request);
        }
        Ok(())
    }

    async fn close(&mut self) -> Result<(), AlthermaError> {
        self.closed.store(true, Ordering::SeqCst);
        Ok(())
    }
}

fn request_field<'a>(request: &'a Value, field: &str) -> &'a str {
    request
        .get(REQUEST_KEY)
        .and_then(|rqp| rqp.get(field))
        .and_then(Value::as_str)
        .unwrap_or_default()
}

/// The `rqi` of a sent request.
pub(crate) fn request_id(request: &Value) -> &str {
    request_field(request, "rqi")
}

/// The `to` of a sent request.
pub(crate) fn request_target(request: &Value) -> &str {
    request_field(request, "to")
}

/// A well-formed response to `request`.
pub(crate) fn reply(request: &Value, result_code: i64, content: Option<Value>) -> Value {
    let mut rsp = json!({
        "rsc": result_code,
        "rqi": request_id(request),
        "to": CLIENT_IDENTITY,
        "fr": "/[0]/MNAE/",
    });
    if let (Some(content), Some(object)) = (content, rsp.as_object_mut()) {
        object.insert("pc".to_string(), content);
    }
    let mut root = serde_json::Map::new();
    root.insert(RESPONSE_KEY.to_string(), rsp);
    Value::Object(root)
}

/// Primitive content holding a content instance.
pub(crate) fn cin(value: Value) -> Value {
    json!({ "m2m:cin": { "con": value, "cnf": TEXT_PLAIN_FORMAT } })
}

/// Primitive content holding device information.
pub(crate) fn dvi(model: &str) -> Value {
    json!({ "m2m:dvi": { "mod": model } })
}

/// A fake adapter serving fixed resources by request target. Unknown
/// targets answer 4004 without content; writes answer 2001.
pub(crate) fn adapter(resources: HashMap<String, (i64, Value)>) -> ScriptedTransport {
    ScriptedTransport::new(move |request| {
        let target = request_target(request);
        let response = match resources.get(target) {
            Some((code, content)) => reply(request, *code, Some(content.clone())),
            None if request.pointer("/m2m:rqp/pc").is_some() => reply(request, 2001, None),
            None => reply(request, 4004, None),
        };
        vec![Frame::text(response.to_string(), true)]
    })
}
