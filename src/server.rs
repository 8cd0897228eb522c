//! MCP Server implementation for Deskpilot
//!
//! This module exposes the [`Computer`] action vocabulary as Model Context
//! Protocol tools. Every action tool answers with the screenshot taken after
//! the action plus the tracked URL.

use rmcp::{
    handler::server::{tool::ToolRouter, wrapper::Parameters},
    model::*,
    schemars, serde, tool, tool_handler, tool_router, ErrorData as McpError, ServerHandler,
};
use serde_json::json;

use crate::computer::Computer;
use crate::config::ControllerConfig;
use crate::core::{DEFAULT_SCROLL_MAGNITUDE, EnvState, ScreenSize, ScrollDirection};
use crate::desktop::DesktopController;
use crate::error::ComputerError;
use crate::worker::ComputerWorker;

/// Parameters for click_at and hover_at tools
#[derive(Debug, serde::Deserialize, schemars::JsonSchema)]
pub struct PointParams {
    /// X coordinate in screen pixels
    pub x: i32,
    /// Y coordinate in screen pixels
    pub y: i32,
}

/// Parameters for type_text_at tool
#[derive(Debug, serde::Deserialize, schemars::JsonSchema)]
pub struct TypeTextParams {
    /// X coordinate of the field to type into
    pub x: i32,
    /// Y coordinate of the field to type into
    pub y: i32,
    /// Text to type
    pub text: String,
    /// Press Enter after typing
    #[serde(default)]
    pub press_enter: bool,
    /// Select all and delete existing content first
    #[serde(default = "default_clear")]
    pub clear_before_typing: bool,
}

fn default_clear() -> bool {
    true
}

/// Parameters for scroll_document tool
#[derive(Debug, serde::Deserialize, schemars::JsonSchema)]
pub struct ScrollDocumentParams {
    /// "up", "down", "left" or "right"
    pub direction: String,
}

/// Parameters for scroll_at tool
#[derive(Debug, serde::Deserialize, schemars::JsonSchema)]
pub struct ScrollAtParams {
    /// X coordinate to scroll at
    pub x: i32,
    /// Y coordinate to scroll at
    pub y: i32,
    /// "up", "down", "left" or "right"
    pub direction: String,
    /// Scroll amount
    #[serde(default = "default_magnitude")]
    pub magnitude: i32,
}

fn default_magnitude() -> i32 {
    DEFAULT_SCROLL_MAGNITUDE
}

/// Parameters for navigate tool
#[derive(Debug, serde::Deserialize, schemars::JsonSchema)]
pub struct NavigateParams {
    /// URL to load; https:// is added when no scheme is given
    pub url: String,
}

/// Parameters for key_combination tool
#[derive(Debug, serde::Deserialize, schemars::JsonSchema)]
pub struct KeyCombinationParams {
    /// Keys pressed together, e.g. ["ControlOrMeta", "c"] or ["Enter"]
    pub keys: Vec<String>,
}

/// Parameters for drag_and_drop tool
#[derive(Debug, serde::Deserialize, schemars::JsonSchema)]
pub struct DragAndDropParams {
    /// Source X coordinate
    pub x: i32,
    /// Source Y coordinate
    pub y: i32,
    /// Destination X coordinate
    pub destination_x: i32,
    /// Destination Y coordinate
    pub destination_y: i32,
}

/// Deskpilot MCP Server
///
/// Provides pixel-level desktop control tools for AI agents.
#[derive(Clone)]
pub struct DeskpilotServer {
    /// Thread owning the desktop controller
    worker: ComputerWorker,
    /// Display size, fixed for the session
    screen_size: ScreenSize,
    /// MCP tool router
    tool_router: ToolRouter<DeskpilotServer>,
}

impl DeskpilotServer {
    /// Create a server driving the local desktop
    pub async fn new(config: ControllerConfig) -> anyhow::Result<Self> {
        let worker = ComputerWorker::spawn(move || DesktopController::from_config(config)).await?;
        Self::with_worker(worker).await
    }

    /// Create a server driving the computer owned by `worker`
    pub async fn with_worker(worker: ComputerWorker) -> anyhow::Result<Self> {
        let screen_size = worker.run(|computer| Ok(computer.screen_size())).await?;

        Ok(Self {
            worker,
            screen_size,
            tool_router: Self::tool_router(),
        })
    }

    async fn dispatch<F>(&self, action: &str, f: F) -> Result<CallToolResult, McpError>
    where
        F: FnOnce(&mut dyn Computer) -> crate::error::Result<EnvState> + Send + 'static,
    {
        match self.worker.run(f).await {
            Ok(state) => Ok(state_result(state)),
            Err(e) => {
                tracing::warn!("{} failed: {}", action, e);
                Ok(error_result(action, &e))
            }
        }
    }
}

fn state_result(state: EnvState) -> CallToolResult {
    let (screenshot, url) = state.into_parts();
    let base64_data =
        base64::Engine::encode(&base64::engine::general_purpose::STANDARD, &screenshot);

    CallToolResult::success(vec![
        Content::image(base64_data, "image/png"),
        Content::text(json!({ "url": url }).to_string()),
    ])
}

fn error_result(action: &str, e: &ComputerError) -> CallToolResult {
    CallToolResult::error(vec![Content::text(
        json!({
            "error": format!("Failed to {}", action),
            "details": e.to_string()
        })
        .to_string(),
    )])
}

#[tool_router]
impl DeskpilotServer {
    #[tool(description = "Report the screen size in pixels. All coordinates are absolute screen pixels.")]
    async fn screen_size(&self) -> Result<CallToolResult, McpError> {
        Ok(CallToolResult::success(vec![Content::text(
            json!({
                "width": self.screen_size.width,
                "height": self.screen_size.height
            })
            .to_string(),
        )]))
    }

    #[tool(description = "Open the initial URL in the system default browser")]
    async fn open_web_browser(&self) -> Result<CallToolResult, McpError> {
        self.dispatch("open browser", |c| c.open_browser()).await
    }

    #[tool(description = "Left-click at screen coordinates")]
    async fn click_at(&self, params: Parameters<PointParams>) -> Result<CallToolResult, McpError> {
        let PointParams { x, y } = params.0;
        self.dispatch("click", move |c| c.click_at(x, y)).await
    }

    #[tool(description = "Move the pointer to screen coordinates without clicking")]
    async fn hover_at(&self, params: Parameters<PointParams>) -> Result<CallToolResult, McpError> {
        let PointParams { x, y } = params.0;
        self.dispatch("hover", move |c| c.hover_at(x, y)).await
    }

    #[tool(description = "Click a field, optionally clear it, type text and optionally press Enter")]
    async fn type_text_at(
        &self,
        params: Parameters<TypeTextParams>,
    ) -> Result<CallToolResult, McpError> {
        let TypeTextParams {
            x,
            y,
            text,
            press_enter,
            clear_before_typing,
        } = params.0;
        self.dispatch("type text", move |c| {
            c.type_text_at(x, y, &text, press_enter, clear_before_typing)
        })
        .await
    }

    #[tool(description = "Scroll the focused document by half a screen: up, down, left or right")]
    async fn scroll_document(
        &self,
        params: Parameters<ScrollDocumentParams>,
    ) -> Result<CallToolResult, McpError> {
        let direction: ScrollDirection = match params.0.direction.parse() {
            Ok(direction) => direction,
            Err(e) => return Ok(error_result("scroll document", &e)),
        };
        self.dispatch("scroll document", move |c| c.scroll_document(direction))
            .await
    }

    #[tool(description = "Move the pointer to screen coordinates and scroll there")]
    async fn scroll_at(
        &self,
        params: Parameters<ScrollAtParams>,
    ) -> Result<CallToolResult, McpError> {
        let ScrollAtParams {
            x,
            y,
            direction,
            magnitude,
        } = params.0;
        let direction: ScrollDirection = match direction.parse() {
            Ok(direction) => direction,
            Err(e) => return Ok(error_result("scroll", &e)),
        };
        self.dispatch("scroll", move |c| c.scroll_at(x, y, direction, magnitude))
            .await
    }

    #[tool(description = "Wait five seconds, then capture the screen")]
    async fn wait_5_seconds(&self) -> Result<CallToolResult, McpError> {
        self.dispatch("wait", |c| c.wait_5_seconds()).await
    }

    #[tool(description = "Go back in browser history")]
    async fn go_back(&self) -> Result<CallToolResult, McpError> {
        self.dispatch("go back", |c| c.go_back()).await
    }

    #[tool(description = "Go forward in browser history")]
    async fn go_forward(&self) -> Result<CallToolResult, McpError> {
        self.dispatch("go forward", |c| c.go_forward()).await
    }

    #[tool(description = "Navigate the focused browser to the search engine")]
    async fn search(&self) -> Result<CallToolResult, McpError> {
        self.dispatch("search", |c| c.search()).await
    }

    #[tool(description = "Navigate the focused browser to a URL through its address bar")]
    async fn navigate(&self, params: Parameters<NavigateParams>) -> Result<CallToolResult, McpError> {
        let url = params.0.url;
        self.dispatch("navigate", move |c| c.navigate(&url)).await
    }

    #[tool(description = "Press a key or key combination, e.g. [\"ControlOrMeta\", \"a\"] or [\"Escape\"]")]
    async fn key_combination(
        &self,
        params: Parameters<KeyCombinationParams>,
    ) -> Result<CallToolResult, McpError> {
        let keys = params.0.keys;
        self.dispatch("press keys", move |c| c.key_combination(&keys))
            .await
    }

    #[tool(description = "Drag with the left button from one screen position to another")]
    async fn drag_and_drop(
        &self,
        params: Parameters<DragAndDropParams>,
    ) -> Result<CallToolResult, McpError> {
        let DragAndDropParams {
            x,
            y,
            destination_x,
            destination_y,
        } = params.0;
        self.dispatch("drag and drop", move |c| {
            c.drag_and_drop(x, y, destination_x, destination_y)
        })
        .await
    }

    #[tool(description = "Capture the screen and the current URL without acting")]
    async fn current_state(&self) -> Result<CallToolResult, McpError> {
        self.dispatch("capture state", |c| c.current_state()).await
    }
}

#[tool_handler]
impl ServerHandler for DeskpilotServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            protocol_version: ProtocolVersion::V_2024_11_05,
            capabilities: ServerCapabilities::builder()
                .enable_tools()
                .build(),
            server_info: Implementation::from_build_env(),
            instructions: Some(
                "Deskpilot controls this desktop by pixel coordinates, key names and screenshots. \
                 Call screen_size first; every action returns a fresh screenshot and the tracked URL. \
                 The URL only changes through open_web_browser, navigate and search."
                    .to_string(),
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    use crate::backend::{BrowserLauncher, InputInjector, ScreenCapturer};
    use crate::core::Platform;
    use crate::desktop::Timings;

    #[derive(Clone, Default)]
    struct Log(Arc<Mutex<Vec<String>>>);

    impl Log {
        fn push(&self, call: String) -> anyhow::Result<()> {
            self.0.lock().unwrap().push(call);
            Ok(())
        }

        fn calls(&self) -> Vec<String> {
            self.0.lock().unwrap().clone()
        }
    }

    impl InputInjector for Log {
        fn move_to(&mut self, x: i32, y: i32) -> anyhow::Result<()> {
            self.push(format!("move {x} {y}"))
        }
        fn click(&mut self, x: i32, y: i32) -> anyhow::Result<()> {
            self.push(format!("click {x} {y}"))
        }
        fn drag_to(&mut self, x: i32, y: i32) -> anyhow::Result<()> {
            self.push(format!("drag {x} {y}"))
        }
        fn press(&mut self, key: &str) -> anyhow::Result<()> {
            self.push(format!("press {key}"))
        }
        fn hotkey(&mut self, keys: &[&str]) -> anyhow::Result<()> {
            self.push(format!("hotkey {}", keys.join("+")))
        }
        fn write(&mut self, text: &str) -> anyhow::Result<()> {
            self.push(format!("write {text}"))
        }
        fn scroll(&mut self, amount: i32) -> anyhow::Result<()> {
            self.push(format!("scroll {amount}"))
        }
        fn hscroll(&mut self, amount: i32) -> anyhow::Result<()> {
            self.push(format!("hscroll {amount}"))
        }
    }

    struct BlankScreen;

    impl ScreenCapturer for BlankScreen {
        fn screen_size(&mut self) -> anyhow::Result<ScreenSize> {
            Ok(ScreenSize::new(800, 600))
        }
        fn capture_png(&mut self) -> anyhow::Result<Vec<u8>> {
            Ok(vec![0x89, b'P', b'N', b'G'])
        }
    }

    struct NoBrowser;

    impl BrowserLauncher for NoBrowser {
        fn open(&mut self, _url: &str) -> anyhow::Result<()> {
            Ok(())
        }
    }

    async fn server(log: &Log) -> DeskpilotServer {
        let input = log.clone();
        let worker = ComputerWorker::spawn(move || {
            DesktopController::with_backends(
                ControllerConfig::default(),
                Platform::Other,
                Box::new(input),
                Box::new(BlankScreen),
                Box::new(NoBrowser),
            )
            .map(|c| c.with_timings(Timings::immediate()))
        })
        .await
        .unwrap();

        DeskpilotServer::with_worker(worker).await.unwrap()
    }

    #[tokio::test]
    async fn test_click_dispatches_to_controller() {
        let log = Log::default();
        let server = server(&log).await;

        let result = server
            .click_at(Parameters(PointParams { x: 10, y: 20 }))
            .await
            .unwrap();

        assert_eq!(result.is_error, Some(false));
        assert_eq!(log.calls(), vec!["click 10 20"]);
    }

    #[tokio::test]
    async fn test_bad_direction_injects_nothing() {
        let log = Log::default();
        let server = server(&log).await;

        let result = server
            .scroll_at(Parameters(ScrollAtParams {
                x: 1,
                y: 2,
                direction: "sideways".to_string(),
                magnitude: 100,
            }))
            .await
            .unwrap();

        assert_eq!(result.is_error, Some(true));
        assert!(log.calls().is_empty());
    }

    #[tokio::test]
    async fn test_extreme_magnitude_keeps_server_usable() {
        let log = Log::default();
        let server = server(&log).await;

        let result = server
            .scroll_at(Parameters(ScrollAtParams {
                x: 0,
                y: 0,
                direction: "down".to_string(),
                magnitude: i32::MIN,
            }))
            .await
            .unwrap();
        assert_eq!(result.is_error, Some(false));

        let result = server
            .click_at(Parameters(PointParams { x: 1, y: 1 }))
            .await
            .unwrap();
        assert_eq!(result.is_error, Some(false));
        assert_eq!(
            log.calls(),
            vec![
                "move 0 0".to_string(),
                format!("scroll {}", i32::MAX),
                "click 1 1".to_string(),
            ]
        );
    }

    #[tokio::test]
    async fn test_screen_size_is_cached() {
        let log = Log::default();
        let server = server(&log).await;

        assert_eq!(server.screen_size, ScreenSize::new(800, 600));
        let result = server.screen_size().await.unwrap();
        assert_eq!(result.is_error, Some(false));
    }
}
