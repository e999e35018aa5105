//! Pure rectangle math for snapping and restoring windows.
//!
//! Nothing here talks to the OS. Callers pass in the work area of the
//! monitor that currently contains the window (taskbar excluded) and
//! apply the returned rectangle themselves.

use crate::Rect;

/// Where a restored window should land.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum RestorePlacement {
    /// Back to the exact pre-snap rectangle.
    #[default]
    Original,
    /// Pre-snap size, centered on the current monitor.
    ///
    /// Only affects restores. An unsnapped window has no saved size, so
    /// a gesture with this placement snaps it like [`Self::Original`].
    Centered,
}

/// Computes the snap target: a rectangle of `width_pct` x `height_pct`
/// percent of the work area, centered inside it.
///
/// Percentages outside `1..=100` are clamped.
pub fn snap_rect(work_area: &Rect, width_pct: u8, height_pct: u8) -> Rect {
    let width = percent_of(work_area.width, width_pct);
    let height = percent_of(work_area.height, height_pct);
    centered(width, height, work_area)
}

/// Computes where a snapped window goes back to.
///
/// With [`RestorePlacement::Original`] the saved rectangle is returned
/// as-is while it is still visible on some monitor. If its monitor was
/// disconnected (no overlap with any entry in `monitors`), the saved
/// size is centered on `work_area` instead. An empty `monitors` slice
/// means the layout is unknown and the saved rectangle is trusted.
pub fn restore_rect(
    saved: &Rect,
    work_area: &Rect,
    monitors: &[Rect],
    placement: RestorePlacement,
) -> Rect {
    let visible = monitors.is_empty() || monitors.iter().any(|m| saved.intersects(m));

    match placement {
        RestorePlacement::Original if visible => *saved,
        _ => centered(saved.width, saved.height, work_area),
    }
}

/// Centers a `width` x `height` rectangle in `work_area`, shrinking it
/// first if it does not fit.
pub fn centered(width: i32, height: i32, work_area: &Rect) -> Rect {
    let width = width.min(work_area.width).max(0);
    let height = height.min(work_area.height).max(0);

    Rect::new(
        work_area.x + (work_area.width - width) / 2,
        work_area.y + (work_area.height - height) / 2,
        width,
        height,
    )
}

fn percent_of(length: i32, pct: u8) -> i32 {
    let pct = i64::from(pct.clamp(1, 100));
    (i64::from(length.max(0)) * pct / 100) as i32
}

#[cfg(test)]
mod tests {
    use super::*;

    const FULL_HD: Rect = Rect {
        x: 0,
        y: 0,
        width: 1920,
        height: 1080,
    };

    #[test]
    fn sixty_percent_of_full_hd_is_centered() {
        // Act
        let rect = snap_rect(&FULL_HD, 60, 60);

        // Assert
        assert_eq!(rect, Rect::new(384, 216, 1152, 648));
    }

    #[test]
    fn snap_uses_work_area_origin_on_secondary_monitor() {
        // Arrange: second monitor to the right, taskbar on top
        let work_area = Rect::new(1920, 40, 2560, 1400);

        // Act
        let rect = snap_rect(&work_area, 50, 50);

        // Assert
        assert_eq!(rect, Rect::new(1920 + 640, 40 + 350, 1280, 700));
        assert!(work_area.contains(&rect));
    }

    #[test]
    fn percentages_are_clamped() {
        // Act
        let full = snap_rect(&FULL_HD, 250, 100);
        let tiny = snap_rect(&FULL_HD, 0, 0);

        // Assert
        assert_eq!(full, FULL_HD);
        assert_eq!(tiny.width, 19);
        assert_eq!(tiny.height, 10);
    }

    #[test]
    fn restore_returns_saved_rect_when_visible() {
        // Arrange
        let saved = Rect::new(100, 80, 800, 600);
        let snapped = snap_rect(&FULL_HD, 76, 76);

        // Act
        let restored = restore_rect(&saved, &FULL_HD, &[FULL_HD], RestorePlacement::Original);

        // Assert
        assert_ne!(snapped, saved);
        assert_eq!(restored, saved);
    }

    #[test]
    fn restore_recenters_when_monitor_is_gone() {
        // Arrange: saved on a monitor at x=1920 that no longer exists
        let saved = Rect::new(2000, 100, 800, 600);

        // Act
        let restored = restore_rect(&saved, &FULL_HD, &[FULL_HD], RestorePlacement::Original);

        // Assert
        assert_eq!(restored, Rect::new(560, 240, 800, 600));
    }

    #[test]
    fn centered_restore_keeps_size() {
        // Arrange
        let saved = Rect::new(0, 0, 1000, 500);

        // Act
        let restored = restore_rect(&saved, &FULL_HD, &[FULL_HD], RestorePlacement::Centered);

        // Assert
        assert_eq!(restored, Rect::new(460, 290, 1000, 500));
    }

    #[test]
    fn oversized_window_is_shrunk_to_fit() {
        // Act
        let rect = centered(4000, 3000, &FULL_HD);

        // Assert
        assert_eq!(rect, FULL_HD);
    }
}
