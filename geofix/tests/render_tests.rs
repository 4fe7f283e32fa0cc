//! Render tests using RenderHarness
//!
//! FRAMEWORK PATTERN: RenderHarness
//! - Create harness with terminal dimensions
//! - Render component to test buffer
//! - Convert to plain text and assert on what the user sees

use geofix::components::{
    Component, LocationScreen, LocationScreenProps, PermissionPrompt, PermissionPromptProps,
};
use geofix::state::{ActiveNotice, AppState};
use geofix_core::testing::*;
use geofix_core::{FetchRequest, Notice, Permission};

fn render_screen(state: &AppState) -> String {
    let mut render = RenderHarness::new(64, 18);
    let mut component = LocationScreen;

    render.render_to_string_plain(|frame| {
        let props = LocationScreenProps {
            state,
            is_focused: state.prompt.is_none(),
        };
        component.render(frame, frame.area(), props);
    })
}

#[test]
fn test_render_first_fetch_in_flight() {
    let mut state = AppState::default();
    state.phase.start(FetchRequest::from_raw(1));
    state.start_time = Some("10:00:00.000".into());

    let output = render_screen(&state);

    assert!(output.contains("timeStart: 10:00:00.000"));
    assert!(output.contains("endTime: -"));
    assert!(!output.contains("Lat:"), "No fix should be shown yet");
}

#[test]
fn test_render_found() {
    let state = AppState {
        location_text: Some("Lat: 37.422, Lng: -122.084".into()),
        start_time: Some("10:00:00.000".into()),
        end_time: Some("10:00:02.004".into()),
        ..Default::default()
    };

    let output = render_screen(&state);

    assert!(output.contains("Lat: 37.422, Lng: -122.084"));
    assert!(output.contains("endTime: 10:00:02.004"));
}

#[test]
fn test_render_not_found_keeps_old_end_time() {
    let state = AppState {
        location_text: Some("Location not found".into()),
        start_time: Some("10:05:00.000".into()),
        end_time: Some("10:00:02.004".into()),
        ..Default::default()
    };

    let output = render_screen(&state);

    assert!(output.contains("Location not found"));
    assert!(output.contains("endTime: 10:00:02.004"));
}

#[test]
fn test_render_denied_notice() {
    let state = AppState {
        notice: Some(ActiveNotice {
            notice: Notice::PermissionDenied,
            remaining_ticks: 20,
        }),
        ..Default::default()
    };

    let output = render_screen(&state);

    assert!(output.contains("Location permission denied"));
}

#[test]
fn test_render_prompt_over_screen() {
    let state = AppState {
        prompt: Some(Permission::FineLocation),
        ..Default::default()
    };
    let mut render = RenderHarness::new(72, 20);
    let mut screen = LocationScreen;
    let mut prompt = PermissionPrompt;

    let output = render.render_to_string_plain(|frame| {
        let area = frame.area();
        screen.render(
            frame,
            area,
            LocationScreenProps {
                state: &state,
                is_focused: false,
            },
        );
        prompt.render(
            frame,
            area,
            PermissionPromptProps {
                permission: Permission::FineLocation,
                is_focused: true,
            },
        );
    });

    assert!(output.contains("Allow geofix to access this device's precise location?"));
    assert!(output.contains("y allow"), "Help bar shows the prompt keys");
}
