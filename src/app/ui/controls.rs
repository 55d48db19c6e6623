use eframe::egui::{self, Key, Response, Ui};
use settings_forge::schema::Value;
use settings_forge::visualizer::RenderHandle;

use super::super::ViewModel;

const SLIDER_KEY_BASE_RATE: f64 = 10.0;
const SLIDER_KEY_ACCEL_PER_SEC: f64 = 9.0;
const SLIDER_KEY_ACCEL_MAX: f64 = 40.0;

#[derive(Clone, Copy, Default)]
struct SliderKeyHoldState {
    positive_secs: f64,
    negative_secs: f64,
    step_carry: f64,
}

fn slider_key_accel_multiplier(hold_secs: f64) -> f64 {
    let ramp = hold_secs * SLIDER_KEY_ACCEL_PER_SEC;
    (1.0 + ramp + ramp * ramp * 0.15).min(SLIDER_KEY_ACCEL_MAX)
}

fn default_slider_key_step(min: f64, max: f64) -> f64 {
    ((max - min) / 200.0).max(0.0005)
}

/// Moves a focused slider while an arrow key is held, speeding up the longer
/// it is held. With `stepped`, movement happens in whole steps and the
/// remainder carries over to the next frame.
fn apply_slider_arrow_acceleration(
    ui: &Ui,
    response: &Response,
    value: &mut f64,
    (min, max): (f64, f64),
    step: f64,
    stepped: bool,
) -> bool {
    let state_id = response.id.with("arrow_key_hold_state");
    let mut hold_state = ui.ctx().data(|data| {
        data.get_temp::<SliderKeyHoldState>(state_id)
            .unwrap_or_default()
    });

    if !response.has_focus() {
        ui.ctx()
            .data_mut(|data| data.insert_temp(state_id, SliderKeyHoldState::default()));
        return false;
    }

    let (delta_time, increase_down, decrease_down) = ui.input(|input| {
        (
            f64::from(input.stable_dt.min(0.1)),
            input.key_down(Key::ArrowRight) || input.key_down(Key::ArrowUp),
            input.key_down(Key::ArrowLeft) || input.key_down(Key::ArrowDown),
        )
    });

    hold_state.positive_secs = if increase_down {
        hold_state.positive_secs + delta_time
    } else {
        0.0
    };
    hold_state.negative_secs = if decrease_down {
        hold_state.negative_secs + delta_time
    } else {
        0.0
    };

    let direction = f64::from(i8::from(increase_down) - i8::from(decrease_down));
    if direction == 0.0 {
        hold_state.step_carry = 0.0;
        ui.ctx()
            .data_mut(|data| data.insert_temp(state_id, hold_state));
        return false;
    }

    let hold_secs = if direction > 0.0 {
        hold_state.positive_secs
    } else {
        hold_state.negative_secs
    };
    let speed = SLIDER_KEY_BASE_RATE * slider_key_accel_multiplier(hold_secs);
    let delta = direction * step * speed * delta_time;

    let old_value = *value;
    let next = if stepped {
        hold_state.step_carry += delta / step;
        let whole_steps = hold_state.step_carry.trunc();
        hold_state.step_carry -= whole_steps;
        *value + whole_steps * step
    } else {
        *value + delta
    };
    *value = next.clamp(min, max);

    ui.ctx().request_repaint();
    ui.ctx()
        .data_mut(|data| data.insert_temp(state_id, hold_state));
    (*value - old_value).abs() > f64::EPSILON
}

impl ViewModel {
    pub(in crate::app) fn draw_slider(
        &mut self,
        ui: &mut Ui,
        title: &str,
        handle: &RenderHandle,
        (min, max): (f64, f64),
        step: Option<f64>,
    ) -> Response {
        let mut value = handle
            .value()
            .and_then(|value| value.as_number())
            .unwrap_or(min);

        let mut slider = egui::Slider::new(&mut value, min..=max)
            .text(title)
            .clamping(egui::SliderClamping::Always);
        if let Some(step) = step {
            slider = slider.step_by(step);
        }
        let response = ui.add(slider);
        if response.hovered() {
            response.request_focus();
        }

        let mut changed = response.changed();
        changed |= apply_slider_arrow_acceleration(
            ui,
            &response,
            &mut value,
            (min, max),
            step.unwrap_or_else(|| default_slider_key_step(min, max)),
            step.is_some(),
        );

        if changed {
            self.commit(title, handle, Value::Number(value));
        }
        response
    }
}
