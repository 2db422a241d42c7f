use winit::event::{ElementState, KeyEvent, WindowEvent};
use winit::keyboard::{KeyCode, PhysicalKey};

/// What a window event means to the sketch
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputAction {
    /// Pointer moved; physical window pixels, origin top-left
    PointerMoved { x: f32, y: f32 },
    /// Container changed size (physical pixels)
    Resized { width: u32, height: u32 },
    /// Window moved to a display with a different pixel density
    ScaleFactorChanged { scale_factor: f64 },
    /// A frame callback fired
    Redraw,
    /// Close button or Escape
    Exit,
}

/// Adapter that bridges Winit events to sketch input actions
pub struct WinitInput;

impl WinitInput {
    /// Translate a Winit WindowEvent; events the sketch ignores map to `None`
    pub fn translate(event: &WindowEvent) -> Option<InputAction> {
        match event {
            WindowEvent::CloseRequested => Some(InputAction::Exit),
            WindowEvent::KeyboardInput { event, .. } if Self::is_escape(event) => {
                Some(InputAction::Exit)
            }
            WindowEvent::CursorMoved { position, .. } => Some(InputAction::PointerMoved {
                x: position.x as f32,
                y: position.y as f32,
            }),
            WindowEvent::Resized(size) => Some(InputAction::Resized {
                width: size.width,
                height: size.height,
            }),
            WindowEvent::ScaleFactorChanged { scale_factor, .. } => {
                Some(InputAction::ScaleFactorChanged {
                    scale_factor: *scale_factor,
                })
            }
            WindowEvent::RedrawRequested => Some(InputAction::Redraw),
            _ => None,
        }
    }

    fn is_escape(event: &KeyEvent) -> bool {
        event.state == ElementState::Pressed
            && event.physical_key == PhysicalKey::Code(KeyCode::Escape)
    }
}
