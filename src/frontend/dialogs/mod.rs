//! Dialog trait system for unified dialog management
//!
//! Each dialog implements the `Dialog` trait, encapsulating its state, actions
//! and rendering; [`show_dialog`] drives the shared window lifecycle.

use egui::{Align2, Color32, Context, Id, LayerId, Order, Ui};

/// Actions that a dialog can return after rendering
#[derive(Debug, Clone, Default)]
pub enum DialogAction<A> {
    /// Keep the dialog open, no action needed
    #[default]
    None,
    /// Close the dialog without performing any action
    Close,
    /// Close the dialog and perform the specified action
    CloseWithAction(A),
    /// Keep the dialog open but perform the specified action
    Action(A),
}

impl<A> DialogAction<A> {
    /// Check if the action indicates the dialog should close
    pub fn should_close(&self) -> bool {
        matches!(self, DialogAction::Close | DialogAction::CloseWithAction(_))
    }

    /// Extract the action if present
    pub fn into_action(self) -> Option<A> {
        match self {
            DialogAction::CloseWithAction(a) | DialogAction::Action(a) => Some(a),
            _ => None,
        }
    }
}

/// Trait for dialog state management
pub trait DialogState: Default {
    /// Reset the dialog state to its default values
    fn reset(&mut self) {
        *self = Self::default();
    }
}

/// Configuration for dialog window appearance and behavior
#[derive(Debug, Clone)]
pub struct DialogWindowConfig {
    pub default_width: f32,
    /// Default height of the dialog window (None for auto)
    pub default_height: Option<f32>,
    pub resizable: bool,
    pub collapsible: bool,
    /// Optional anchor position (alignment and offset)
    pub anchor: Option<(Align2, [f32; 2])>,
    /// Dim the rest of the window and block input behind the dialog
    pub modal: bool,
}

impl Default for DialogWindowConfig {
    fn default() -> Self {
        Self {
            default_width: 400.0,
            default_height: None,
            resizable: true,
            collapsible: false,
            anchor: None,
            modal: false,
        }
    }
}

impl DialogWindowConfig {
    /// Create a centered modal dialog configuration
    pub fn centered_modal(width: f32) -> Self {
        Self {
            default_width: width,
            default_height: None,
            resizable: false,
            collapsible: false,
            anchor: Some((Align2::CENTER_CENTER, [0.0, 0.0])),
            modal: true,
        }
    }

    /// Create a resizable dialog with specified size
    pub fn resizable(width: f32, height: f32) -> Self {
        Self {
            default_width: width,
            default_height: Some(height),
            ..Self::default()
        }
    }
}

/// Main dialog trait for implementing dialogs
///
/// The trait uses associated types for type-safe state, actions, and context.
pub trait Dialog {
    /// The state type for this dialog
    type State: DialogState;

    /// The action type this dialog can produce
    type Action;

    /// The context type needed to render this dialog
    type Context<'a>;

    /// Get the window title for this dialog
    fn title(state: &Self::State) -> &'static str;

    /// Get the window configuration for this dialog
    fn window_config() -> DialogWindowConfig {
        DialogWindowConfig::default()
    }

    /// Render the dialog content
    fn render(
        state: &mut Self::State,
        ctx: Self::Context<'_>,
        ui: &mut Ui,
    ) -> DialogAction<Self::Action>;
}

/// Show a dialog using the Dialog trait
///
/// Only renders while `is_open` is true; closing resets the state.
/// Returns `Some(action)` if the dialog produced an action.
pub fn show_dialog<D: Dialog>(
    ctx: &Context,
    is_open: &mut bool,
    state: &mut D::State,
    dialog_ctx: D::Context<'_>,
) -> Option<D::Action> {
    if !*is_open {
        return None;
    }

    let config = D::window_config();
    let mut action_result: Option<D::Action> = None;
    let mut should_close = false;

    if config.modal {
        let backdrop = LayerId::new(Order::Middle, Id::new("dialog_backdrop"));
        ctx.layer_painter(backdrop).rect_filled(
            ctx.screen_rect(),
            0.0,
            Color32::from_black_alpha(120),
        );
    }

    let mut window = egui::Window::new(D::title(state))
        .collapsible(config.collapsible)
        .resizable(config.resizable)
        .default_width(config.default_width)
        .order(if config.modal { Order::Foreground } else { Order::Middle });

    if let Some(height) = config.default_height {
        window = window.default_height(height);
    }

    if let Some((align, offset)) = config.anchor {
        window = window.anchor(align, offset);
    }

    window.show(ctx, |ui| match D::render(state, dialog_ctx, ui) {
        DialogAction::None => {}
        DialogAction::Close => {
            should_close = true;
        }
        DialogAction::CloseWithAction(a) => {
            should_close = true;
            action_result = Some(a);
        }
        DialogAction::Action(a) => {
            action_result = Some(a);
        }
    });

    if should_close {
        *is_open = false;
        state.reset();
    }

    action_result
}

pub mod clear_confirm;
pub mod open_pipeline;
pub mod rule_matcher;

pub use clear_confirm::{ClearConfirmAction, ClearConfirmContext, ClearConfirmDialog, ClearConfirmState};
pub use open_pipeline::{
    OpenPipelineAction, OpenPipelineContext, OpenPipelineDialog, OpenPipelineState,
};
pub use rule_matcher::{RuleMatcherAction, RuleMatcherContext, RuleMatcherDialog, RuleMatcherState};
