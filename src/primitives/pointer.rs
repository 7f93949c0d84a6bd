//! Pointer primitives - tilt cards and magnetic buttons.

use crate::host::SharedHost;
use crate::state::{FollowController, FollowKind};
use crate::types::ElementHandle;

use super::types::{MagneticButtonProps, Mounted, TiltCardProps, MAGNETIC_BUTTON_CLASS, TILT_CARD_CLASS};

fn mount_follow(host: &SharedHost, element: ElementHandle, base_class: &str, kind: FollowKind) -> Mounted {
    host.add_class(element, base_class);
    let controller = FollowController::attach(host.clone(), element, kind);
    Mounted::new(element, Box::new(move || controller.teardown()))
}

/// Card that tilts toward the pointer in 3D.
pub fn tilt_card(host: &SharedHost, element: ElementHandle, props: TiltCardProps) -> Mounted {
    mount_follow(host, element, TILT_CARD_CLASS, FollowKind::Tilt(props.params))
}

/// Button pulled toward a nearby pointer.
pub fn magnetic_button(host: &SharedHost, element: ElementHandle, props: MagneticButtonProps) -> Mounted {
    mount_follow(host, element, MAGNETIC_BUTTON_CLASS, FollowKind::Magnetic(props.params))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::rc::Rc;

    use crate::host::SimulatedHost;
    use crate::types::{Rect, Transform, Vec2};

    fn setup() -> (Rc<SimulatedHost>, SharedHost, ElementHandle) {
        let sim = Rc::new(SimulatedHost::new(1280.0, 800.0));
        let host: SharedHost = sim.clone();
        let el = sim.create_element(None, Rect::new(200.0, 200.0, 160.0, 48.0));
        (sim, host, el)
    }

    #[test]
    fn test_tilt_card_writes_tilt_transforms() {
        let (sim, host, el) = setup();
        let mounted = tilt_card(&host, el, TiltCardProps::default());
        assert!(sim.has_class(el, TILT_CARD_CLASS));

        sim.pointer_move(Vec2::new(210.0, 210.0));
        sim.run_frames(5);
        match sim.transform(el) {
            Some(Transform::Tilt { rotate_x, rotate_y, .. }) => {
                // Top-left corner: top tips away, left edge turns away.
                assert!(rotate_x < 0.0);
                assert!(rotate_y > 0.0);
            }
            other => panic!("unexpected transform {other:?}"),
        }

        mounted.unmount();
        assert_eq!(sim.pending_frames(), 0);
    }

    #[test]
    fn test_magnetic_button_writes_translations() {
        let (sim, host, el) = setup();
        let _mounted = magnetic_button(&host, el, MagneticButtonProps::default());
        assert!(sim.has_class(el, MAGNETIC_BUTTON_CLASS));

        // Center is (280, 224); pointer 20px right of it.
        sim.pointer_move(Vec2::new(300.0, 224.0));
        sim.run_frames(40);
        match sim.transform(el) {
            Some(Transform::Translate { x, y }) => {
                assert!((x - 18.0).abs() < 0.5);
                assert!(y.abs() < 1e-9);
            }
            other => panic!("unexpected transform {other:?}"),
        }
    }
}
