use soft_surface::core::Surface;
use soft_surface::platform::{HeadlessInstance, HeadlessWindow, ResourceEvent};
use soft_surface::types::{AllocationCallbacks, Rect};
use soft_surface::{
    AttachPolicy, Extent2D, PresentationSurface, SoftwareImage, SurfaceConfig, SurfaceCreateInfo,
    SurfaceError,
};

fn surface_for(window: &HeadlessWindow, config: SurfaceConfig) -> Surface<HeadlessWindow> {
    Surface::new(SurfaceCreateInfo::new(HeadlessInstance, window.clone()), config)
        .expect("surface creation")
}

fn create_surface(width: u32, height: u32) -> (HeadlessWindow, Surface<HeadlessWindow>) {
    let window = HeadlessWindow::new(Extent2D::new(width, height));
    let surface = surface_for(&window, SurfaceConfig::default());
    (window, surface)
}

/// Surface over a window that records every resource call
fn create_logged_surface(width: u32, height: u32) -> (HeadlessWindow, Surface<HeadlessWindow>) {
    let window = HeadlessWindow::with_event_log(Extent2D::new(width, height));
    let surface = surface_for(&window, SurfaceConfig::default());
    (window, surface)
}

fn frame(width: u32, height: u32) -> SoftwareImage {
    SoftwareImage::new(Extent2D::new(width, height))
}

// ============================================================================
// Capabilities
// ============================================================================

#[test]
fn test_capabilities_report_window_extent() {
    let (_window, surface) = create_surface(800, 600);
    let caps = surface.capabilities().unwrap();

    let expected = Extent2D::new(800, 600);
    assert_eq!(caps.current_extent, expected);
    assert_eq!(caps.min_image_extent, expected);
    assert_eq!(caps.max_image_extent, expected);
}

#[test]
fn test_capabilities_min_max_current_always_equal() {
    let (window, surface) = create_surface(800, 600);
    for (w, h) in [(1, 1), (640, 480), (1920, 1080), (0, 0), (3840, 2160)] {
        window.resize(Extent2D::new(w, h));
        let caps = surface.capabilities().unwrap();
        assert_eq!(caps.min_image_extent, caps.current_extent);
        assert_eq!(caps.max_image_extent, caps.current_extent);
        assert_eq!(caps.current_extent, Extent2D::new(w, h));
    }
}

#[test]
fn test_required_allocation_size_is_zero() {
    let window = HeadlessWindow::new(Extent2D::new(800, 600));
    let info = SurfaceCreateInfo::new(HeadlessInstance, window);
    assert_eq!(Surface::required_allocation_size(&info), 0);
}

// ============================================================================
// Present and reconciliation
// ============================================================================

#[test]
fn test_resize_then_present_reallocates_once() {
    let (window, mut surface) = create_logged_surface(800, 600);
    window.clear_events();

    window.resize(Extent2D::new(1024, 768));
    surface.present(&frame(1024, 768)).unwrap();

    assert_eq!(surface.extent(), Extent2D::new(1024, 768));
    assert_eq!(
        window.events(),
        vec![
            ResourceEvent::ReleaseDrawContext,
            ResourceEvent::FreeHeader(Extent2D::new(800, 600)),
            ResourceEvent::AcquireDrawContext,
            ResourceEvent::CreateHeader(Extent2D::new(1024, 768)),
            ResourceEvent::Blit {
                destination: Rect::new(0, 0, 1024, 768),
                source: Rect::new(0, 0, 1024, 768),
            },
        ]
    );
    assert_eq!(surface.stats().reallocations, 1);
}

#[test]
fn test_present_without_resize_does_not_reallocate() {
    let (window, mut surface) = create_surface(800, 600);
    let image = frame(800, 600);

    surface.present(&image).unwrap();
    surface.present(&image).unwrap();

    let counters = window.counters();
    assert_eq!(counters.draw_contexts_acquired, 1);
    assert_eq!(counters.headers_created, 1);
    assert_eq!(counters.blits, 2);
    assert_eq!(surface.stats().reallocations, 0);
    assert_eq!(surface.stats().presents, 2);
}

#[test]
fn test_cached_extent_tracks_every_probe() {
    let (window, mut surface) = create_surface(800, 600);
    let sizes = [
        (800, 600),
        (1024, 768),
        (1024, 768),
        (640, 480),
        (0, 0),
        (1280, 720),
        (1280, 720),
        (800, 600),
    ];

    let mut expected_reallocations = 0;
    let mut previous = Extent2D::new(800, 600);
    for (w, h) in sizes {
        let extent = Extent2D::new(w, h);
        window.resize(extent);
        if extent != previous {
            expected_reallocations += 1;
        }
        previous = extent;

        surface.present(&frame(w, h)).unwrap();
        assert_eq!(surface.extent(), extent);
        assert_eq!(surface.buffer().map(|b| b.extent()), Some(extent));
    }

    let counters = window.counters();
    assert_eq!(surface.stats().reallocations, expected_reallocations);
    assert_eq!(counters.draw_contexts_acquired, expected_reallocations + 1);
    assert_eq!(counters.live_draw_contexts(), 1);
    assert_eq!(counters.live_headers(), 1);
}

#[test]
fn test_every_reallocation_releases_before_allocating() {
    let (window, mut surface) = create_logged_surface(100, 100);
    window.clear_events();

    for step in 1..=5u32 {
        window.resize(Extent2D::new(100 + step, 100));
        surface.present(&frame(100 + step, 100)).unwrap();
    }

    // Resource events only, blits filtered out
    let events: Vec<_> = window
        .events()
        .into_iter()
        .filter(|e| !matches!(e, ResourceEvent::Blit { .. }))
        .collect();
    assert_eq!(events.len(), 5 * 4);
    for chunk in events.chunks(4) {
        assert!(matches!(chunk[0], ResourceEvent::ReleaseDrawContext));
        assert!(matches!(chunk[1], ResourceEvent::FreeHeader(_)));
        assert!(matches!(chunk[2], ResourceEvent::AcquireDrawContext));
        assert!(matches!(chunk[3], ResourceEvent::CreateHeader(_)));
    }
}

#[test]
fn test_stale_image_is_stretched_to_new_extent() {
    let (window, mut surface) = create_logged_surface(800, 600);
    window.clear_events();
    window.resize(Extent2D::new(1024, 768));

    // Image rendered before the resize was noticed
    surface.present(&frame(800, 600)).unwrap();

    let blit = window
        .events()
        .into_iter()
        .find(|e| matches!(e, ResourceEvent::Blit { .. }))
        .unwrap();
    assert_eq!(
        blit,
        ResourceEvent::Blit {
            destination: Rect::new(0, 0, 1024, 768),
            source: Rect::new(0, 0, 800, 600),
        }
    );
}

#[test]
fn test_long_run_keeps_no_event_history() {
    let (window, mut surface) = create_surface(2, 2);
    let image = frame(2, 2);
    for _ in 0..10_000 {
        surface.present(&image).unwrap();
    }

    assert!(window.events().is_empty());
    assert_eq!(window.counters().blits, 10_000);
}

// ============================================================================
// Attach
// ============================================================================

#[test]
fn test_reject_policy_accepts_image_sized_from_capabilities_after_resize() {
    let window = HeadlessWindow::new(Extent2D::new(800, 600));
    let mut surface = surface_for(
        &window,
        SurfaceConfig {
            attach_policy: AttachPolicy::Reject,
        },
    );

    window.resize(Extent2D::new(1024, 768));
    let extent = surface.capabilities().unwrap().current_extent;
    let image = SoftwareImage::new(extent);

    surface.attach_image(&image).unwrap();
    surface.present(&image).unwrap();
    surface.detach_image(&image);

    assert_eq!(surface.extent(), Extent2D::new(1024, 768));
    assert_eq!(
        surface.attach_image(&frame(800, 600)),
        Err(SurfaceError::ExtentMismatch {
            surface: Extent2D::new(1024, 768),
            image: Extent2D::new(800, 600),
        })
    );
}

// ============================================================================
// Failures
// ============================================================================

#[test]
fn test_present_on_closed_window_is_invalid_handle() {
    let (window, mut surface) = create_surface(64, 64);
    window.close();
    assert_eq!(
        surface.present(&frame(64, 64)),
        Err(SurfaceError::InvalidHandle)
    );
    assert_eq!(surface.stats().failed_presents, 1);
}

#[test]
fn test_blit_failure_is_presentation_failed() {
    let (window, mut surface) = create_surface(64, 64);
    window.fail_next_blit();

    let err = surface.present(&frame(64, 64)).unwrap_err();
    assert!(matches!(err, SurfaceError::PresentationFailed(_)));

    // Buffer stays usable
    surface.present(&frame(64, 64)).unwrap();
    assert_eq!(window.counters().draw_contexts_acquired, 1);
}

#[test]
fn test_failed_header_during_reconciliation_leaves_nothing_dangling() {
    let (window, mut surface) = create_surface(64, 64);
    window.resize(Extent2D::new(128, 128));
    window.fail_next_header();

    let err = surface.present(&frame(128, 128)).unwrap_err();
    assert!(matches!(err, SurfaceError::ResourceAllocationFailed(_)));
    assert!(surface.is_degraded());
    assert!(surface.buffer().is_none());

    let counters = window.counters();
    assert_eq!(counters.live_draw_contexts(), 0);
    assert_eq!(counters.live_headers(), 0);

    surface.present(&frame(128, 128)).unwrap();
    assert!(!surface.is_degraded());
    assert_eq!(window.counters().live_headers(), 1);
}

#[test]
fn test_zero_area_image_is_skipped() {
    let (window, mut surface) = create_surface(4, 4);
    surface.present(&frame(0, 4)).unwrap();

    assert_eq!(window.counters().blits, 0);
    assert_eq!(surface.stats().skipped_blits, 1);
    assert_eq!(surface.stats().presents, 1);
}

// ============================================================================
// Destruction
// ============================================================================

#[test]
fn test_destroy_releases_everything_exactly_once() {
    let (window, mut surface) = create_surface(800, 600);
    surface.present(&frame(800, 600)).unwrap();

    surface.destroy(Some(&AllocationCallbacks::default()));
    surface.destroy(None);
    drop(surface);

    let counters = window.counters();
    assert_eq!(counters.draw_contexts_acquired, 1);
    assert_eq!(counters.draw_contexts_released, 1);
    assert_eq!(counters.headers_created, 1);
    assert_eq!(counters.headers_freed, 1);
}

#[test]
fn test_present_after_destroy_is_rejected() {
    let (window, mut surface) = create_surface(800, 600);
    surface.destroy(None);

    assert_eq!(
        surface.present(&frame(800, 600)),
        Err(SurfaceError::Destroyed)
    );
    assert_eq!(window.counters().blits, 0);
    assert_eq!(window.counters().draw_contexts_acquired, 1);
}

#[test]
fn test_drop_without_destroy_releases() {
    let (window, surface) = create_surface(32, 32);
    drop(surface);
    assert_eq!(window.counters().live_draw_contexts(), 0);
    assert_eq!(window.counters().live_headers(), 0);
}
