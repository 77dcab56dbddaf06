use crate::engine::core::app_state::{AppState, MouseFollow, SceneEvent};
use crate::engine::core::lifecycle::UnmountRequest;
use crate::engine::scene::model_follow::MaskModel;
use crate::engine::systems::fps_tracking::smoothed_fps;
use bevy::diagnostic::DiagnosticsStore;
use bevy::prelude::*;
use serde::{Deserialize, Serialize};

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::JsValue;

#[cfg(target_arch = "wasm32")]
use web_sys::{MessageEvent, window};

/// JSON-RPC 2.0 request structure.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct RpcRequest {
    pub jsonrpc: String,
    pub method: String,
    #[serde(default)]
    pub params: serde_json::Value,
    pub id: Option<serde_json::Value>,
}

/// JSON-RPC 2.0 response structure.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct RpcResponse {
    pub jsonrpc: String,
    pub result: Option<serde_json::Value>,
    pub error: Option<RpcError>,
    pub id: Option<serde_json::Value>,
}

/// JSON-RPC 2.0 notification structure for one-way communication.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct RpcNotification {
    pub jsonrpc: String,
    pub method: String,
    pub params: serde_json::Value,
}

/// JSON-RPC 2.0 error object.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct RpcError {
    pub code: i32,
    pub message: String,
    pub data: Option<serde_json::Value>,
}

/// Outgoing messages for the host page, flushed once per frame.
#[derive(Resource, Default)]
pub struct WebRpcInterface {
    outgoing_notifications: Vec<RpcNotification>,
    outgoing_responses: Vec<RpcResponse>,
}

impl WebRpcInterface {
    /// Send notification to the host page without expecting a response.
    pub fn send_notification(&mut self, method: &str, params: serde_json::Value) {
        self.outgoing_notifications.push(RpcNotification {
            jsonrpc: "2.0".to_string(),
            method: method.to_string(),
            params,
        });
    }

    fn queue_response(&mut self, response: RpcResponse) {
        self.outgoing_responses.push(response);
    }
}

/// Scene state as reported to the host page.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SceneSnapshot {
    pub state: AppState,
    pub mouse_follow: bool,
    pub model_loaded: bool,
    pub fps: Option<f64>,
}

/// postMessage bridge between the canvas and the page hosting it.
pub struct WebRpcPlugin;

impl Plugin for WebRpcPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<WebRpcInterface>()
            .add_event::<IncomingRpcMessage>()
            .add_systems(
                Update,
                (
                    process_incoming_messages,
                    handle_rpc_messages,
                    forward_scene_events,
                    send_outgoing_messages,
                )
                    .chain(),
            );

        #[cfg(target_arch = "wasm32")]
        app.add_systems(Startup, setup_message_listener)
            .add_systems(OnEnter(AppState::Unmounted), remove_message_listener);
    }
}

/// Host `message` listener, kept so it can be removed again on unmount.
#[cfg(target_arch = "wasm32")]
struct MessageListener(Closure<dyn FnMut(MessageEvent)>);

#[cfg(target_arch = "wasm32")]
fn setup_message_listener(world: &mut World) {
    use std::sync::{Arc, Mutex};

    let message_queue: Arc<Mutex<Vec<String>>> = Arc::new(Mutex::new(Vec::new()));
    let queue_clone = message_queue.clone();

    let closure = Closure::wrap(Box::new(move |event: MessageEvent| {
        if let Ok(data) = event.data().dyn_into::<js_sys::JsString>() {
            let message_str: String = data.into();
            if message_str.contains("jsonrpc") {
                if let Ok(mut queue) = queue_clone.lock() {
                    queue.push(message_str);
                }
            }
        }
    }) as Box<dyn FnMut(MessageEvent)>);

    let Some(window) = window() else {
        error!("Window object not available, host RPC disabled");
        return;
    };
    if let Err(e) =
        window.add_event_listener_with_callback("message", closure.as_ref().unchecked_ref())
    {
        error!("Failed to register message listener: {:?}", e);
        return;
    }

    world.insert_non_send_resource(MessageListener(closure));
    world.insert_resource(MessageQueue(message_queue));
}

#[cfg(target_arch = "wasm32")]
fn remove_message_listener(world: &mut World) {
    world.remove_resource::<MessageQueue>();
    let Some(listener) = world.remove_non_send_resource::<MessageListener>() else {
        return;
    };
    if let Some(window) = window() {
        if let Err(e) = window
            .remove_event_listener_with_callback("message", listener.0.as_ref().unchecked_ref())
        {
            error!("Failed to remove message listener: {:?}", e);
        }
    }
}

/// Messages pushed by the host listener, drained each frame.
#[derive(Resource)]
struct MessageQueue(std::sync::Arc<std::sync::Mutex<Vec<String>>>);

#[derive(Event)]
struct IncomingRpcMessage {
    content: String,
}

fn process_incoming_messages(
    message_queue: Option<Res<MessageQueue>>,
    mut message_events: EventWriter<IncomingRpcMessage>,
) {
    let Some(queue_res) = message_queue else {
        return;
    };

    let messages = if let Ok(mut queue) = queue_res.0.lock() {
        std::mem::take(&mut *queue)
    } else {
        Vec::new()
    };

    for message_str in messages {
        message_events.write(IncomingRpcMessage {
            content: message_str,
        });
    }
}

fn handle_rpc_messages(
    mut events: EventReader<IncomingRpcMessage>,
    diagnostics: Res<DiagnosticsStore>,
    state: Res<State<AppState>>,
    mouse_follow: Res<MouseFollow>,
    models: Query<(), With<MaskModel>>,
    mut rpc_interface: ResMut<WebRpcInterface>,
    mut unmount_requests: EventWriter<UnmountRequest>,
) {
    let snapshot = SceneSnapshot {
        state: *state.get(),
        mouse_follow: mouse_follow.enabled(),
        model_loaded: !models.is_empty(),
        fps: smoothed_fps(&diagnostics),
    };

    for event in events.read() {
        match serde_json::from_str::<RpcRequest>(&event.content) {
            Ok(request) => {
                debug!("Processing RPC method: {}", request.method);
                if request.method == "unmount" {
                    unmount_requests.write(UnmountRequest);
                }
                if let Some(response) = handle_rpc_request(&request, &snapshot) {
                    rpc_interface.queue_response(response);
                }
            }
            Err(parse_error) => {
                warn!("Discarding malformed RPC message: {}", parse_error);
            }
        }
    }
}

/// Build the response for a request. Notifications (no id) get none.
fn handle_rpc_request(request: &RpcRequest, snapshot: &SceneSnapshot) -> Option<RpcResponse> {
    let id = request.id.clone()?;

    let result = match request.method.as_str() {
        "get_scene_state" => handle_get_scene_state(snapshot),
        "get_fps" => handle_get_fps(snapshot),
        "unmount" => Ok(serde_json::json!({ "success": true })),
        _ => {
            warn!("Unknown RPC method: {}", request.method);
            return Some(create_error_response(
                id,
                -32601,
                "Method not found",
                Some(serde_json::json!({"method": request.method})),
            ));
        }
    };

    match result {
        Ok(result_value) => Some(RpcResponse {
            jsonrpc: "2.0".to_string(),
            result: Some(result_value),
            error: None,
            id: Some(id),
        }),
        Err(error) => Some(RpcResponse {
            jsonrpc: "2.0".to_string(),
            result: None,
            error: Some(error),
            id: Some(id),
        }),
    }
}

fn handle_get_scene_state(snapshot: &SceneSnapshot) -> Result<serde_json::Value, RpcError> {
    Ok(serde_json::json!({
        "state": snapshot.state.as_str(),
        "mouse_follow": snapshot.mouse_follow,
        "model_loaded": snapshot.model_loaded,
    }))
}

fn handle_get_fps(snapshot: &SceneSnapshot) -> Result<serde_json::Value, RpcError> {
    let fps = snapshot
        .fps
        .ok_or_else(|| RpcError::internal_error("Frame time diagnostics not ready"))?;
    Ok(serde_json::json!({
        "fps": fps as f32
    }))
}

fn create_error_response(
    id: serde_json::Value,
    code: i32,
    message: &str,
    data: Option<serde_json::Value>,
) -> RpcResponse {
    RpcResponse {
        jsonrpc: "2.0".to_string(),
        result: None,
        error: Some(RpcError {
            code,
            message: message.to_string(),
            data,
        }),
        id: Some(id),
    }
}

/// Turn scene milestones into host notifications.
fn forward_scene_events(
    mut scene_events: EventReader<SceneEvent>,
    mut rpc_interface: ResMut<WebRpcInterface>,
) {
    for event in scene_events.read() {
        match event {
            SceneEvent::AssetsLoaded => {
                rpc_interface.send_notification("assets_loaded", serde_json::json!({}))
            }
            SceneEvent::LoadFailed { reason } => rpc_interface.send_notification(
                "asset_load_failed",
                serde_json::json!({ "reason": reason }),
            ),
            SceneEvent::IntroCompleted => {
                rpc_interface.send_notification("intro_complete", serde_json::json!({}))
            }
        }
    }
}

fn send_outgoing_messages(mut rpc_interface: ResMut<WebRpcInterface>) {
    for notification in rpc_interface.outgoing_notifications.drain(..) {
        send_message_to_parent(&notification);
    }

    for response in rpc_interface.outgoing_responses.drain(..) {
        send_message_to_parent(&response);
    }
}

/// Post a serialized message to the parent window.
fn send_message_to_parent<T: Serialize>(message: &T) {
    #[cfg(target_arch = "wasm32")]
    {
        match serde_json::to_string(message) {
            Ok(json) => {
                if let Some(window) = window() {
                    if let Some(parent) = window.parent().ok().flatten() {
                        if let Err(e) = parent.post_message(&JsValue::from_str(&json), "*") {
                            error!("Failed to send message to parent: {:?}", e);
                        }
                    } else {
                        warn!("No parent window available for message transmission");
                    }
                } else {
                    error!("Window object not available");
                }
            }
            Err(e) => {
                error!("Failed to serialize message: {}", e);
            }
        }
    }

    #[cfg(not(target_arch = "wasm32"))]
    {
        let _ = message;
    }
}

impl RpcError {
    pub fn internal_error(message: &str) -> Self {
        Self {
            code: -32603,
            message: message.to_string(),
            data: None,
        }
    }
}
