//! Desktop-backed host session
//!
//! Lets the bridge run against the local desktop when no device host is
//! attached. The "tree" is shallow: a desktop root with one child per visible
//! top-level window. Input goes through enigo, capture through xcap.

pub mod capture;
pub mod input;

pub use capture::DesktopCapture;
pub use input::{DesktopConnection, DesktopInput};

use anyhow::Result;
use std::sync::Arc;
use xcap::Window;

use super::session::{AccessibleNode, AutomationSession, InputSession};
use super::types::{ForegroundApp, NodeBounds, ScreenMetrics, WindowInfo};

const BASE_DPI: f32 = 96.0;

#[derive(Debug, Clone)]
struct DesktopWindow {
    id: u32,
    title: String,
    app_name: String,
    x: i32,
    y: i32,
    width: u32,
    height: u32,
}

impl DesktopWindow {
    fn bounds(&self) -> (i32, i32, i32, i32) {
        (
            self.x,
            self.y,
            self.x.saturating_add(self.width as i32),
            self.y.saturating_add(self.height as i32),
        )
    }
}

/// Visible top-level windows, front-most first as reported by the OS
fn visible_windows() -> Result<Vec<DesktopWindow>> {
    let windows = Window::all().map_err(|e| anyhow::anyhow!("Failed to get windows: {}", e))?;

    Ok(windows
        .into_iter()
        .filter(|w| !w.title().is_empty() && !w.is_minimized())
        .map(|w| DesktopWindow {
            id: w.id(),
            title: w.title().to_string(),
            app_name: w.app_name().to_string(),
            x: w.x(),
            y: w.y(),
            width: w.width(),
            height: w.height(),
        })
        .collect())
}

/// Raw node handed to the tree parser.
#[derive(Debug, Clone)]
struct DesktopNode {
    class: &'static str,
    text: Option<String>,
    description: Option<String>,
    bounds: (i32, i32, i32, i32),
    children: Vec<DesktopNode>,
}

impl AccessibleNode for DesktopNode {
    fn class_name(&self) -> String {
        self.class.to_string()
    }

    fn text(&self) -> Option<String> {
        self.text.clone()
    }

    fn content_description(&self) -> Option<String> {
        self.description.clone()
    }

    fn resource_id(&self) -> Option<String> {
        None
    }

    fn bounds_in_screen(&self) -> (i32, i32, i32, i32) {
        self.bounds
    }

    fn is_visible_to_user(&self) -> bool {
        true
    }

    fn is_focusable(&self) -> bool {
        self.class == "Window"
    }

    fn child_count(&self) -> usize {
        self.children.len()
    }

    fn child(&self, index: usize) -> Option<Box<dyn AccessibleNode>> {
        self.children
            .get(index)
            .cloned()
            .map(|c| Box::new(c) as Box<dyn AccessibleNode>)
    }
}

fn desktop_tree(screen: (u32, u32), windows: Vec<DesktopWindow>) -> DesktopNode {
    DesktopNode {
        class: "Desktop",
        text: None,
        description: None,
        bounds: (0, 0, screen.0 as i32, screen.1 as i32),
        children: windows
            .into_iter()
            .map(|w| DesktopNode {
                class: "Window",
                bounds: w.bounds(),
                text: Some(w.title),
                description: Some(w.app_name).filter(|a| !a.is_empty()),
                children: Vec::new(),
            })
            .collect(),
    }
}

fn window_info(index: usize, w: &DesktopWindow) -> WindowInfo {
    let (left, top, right, bottom) = w.bounds();
    WindowInfo {
        id: w.id.to_string(),
        title: w.title.clone(),
        package_name: Some(w.app_name.clone()).filter(|a| !a.is_empty()),
        bounds: NodeBounds::new(left, top, right, bottom),
        layer: index as i32,
        is_focused: index == 0,
        is_active: index == 0,
    }
}

/// Automation session over the local desktop.
pub struct DesktopSession {
    input: Arc<DesktopInput>,
}

impl DesktopSession {
    pub fn new() -> Self {
        Self {
            input: Arc::new(DesktopInput::new()),
        }
    }
}

impl Default for DesktopSession {
    fn default() -> Self {
        Self::new()
    }
}

impl AutomationSession for DesktopSession {
    fn is_connected(&self) -> bool {
        true
    }

    fn root_node(&self) -> Result<Option<Box<dyn AccessibleNode>>> {
        let monitor = capture::primary_monitor()?;
        let windows = visible_windows()?;
        let root = desktop_tree((monitor.width(), monitor.height()), windows);
        Ok(Some(Box::new(root)))
    }

    fn windows(&self) -> Result<Vec<WindowInfo>> {
        Ok(visible_windows()?
            .iter()
            .enumerate()
            .map(|(i, w)| window_info(i, w))
            .collect())
    }

    fn foreground_app(&self) -> Result<Option<ForegroundApp>> {
        Ok(visible_windows()?.into_iter().next().map(|w| ForegroundApp {
            package_name: w.app_name,
            activity_name: w.title,
        }))
    }

    fn screen_metrics(&self) -> Result<ScreenMetrics> {
        let monitor = capture::primary_monitor()?;
        Ok(ScreenMetrics {
            width: monitor.width(),
            height: monitor.height(),
            density_dpi: (BASE_DPI * monitor.scale_factor()).round() as u32,
        })
    }

    fn input_session(&self) -> Option<Arc<dyn InputSession>> {
        Some(self.input.clone())
    }
}
