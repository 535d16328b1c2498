use mandelbrot::pool::PoolScheduler;
use mandelbrot::render::Frame;
use mandelbrot::scheduler::Scheduler;
use mandelbrot::{Canvas, Color, ComplexPlane, Palette, PixelBuffer, Pixel};
use std::thread;
use std::time::Duration;

/// A buffer that takes its time over every write.
struct SlowCanvas(PixelBuffer);

impl Canvas for SlowCanvas {
    fn width(&self) -> usize {
        self.0.width()
    }

    fn height(&self) -> usize {
        self.0.height()
    }

    fn set(&self, pixel: Pixel, color: Color) {
        thread::sleep(Duration::from_micros(500));
        self.0.set(pixel, color);
    }
}

#[test]
fn producer_never_runs_ahead_of_the_queue() {
    let frame = Frame::new(ComplexPlane::default(), 20, 100, Palette::default()).unwrap();
    let (width, height) = (frame.plane.width(), frame.plane.height());
    let canvas = SlowCanvas(PixelBuffer::new(width, height, Color::BLACK));

    let (parallelism, capacity) = (1, 1);
    let report = PoolScheduler::new(parallelism, capacity)
        .run(&frame, &canvas)
        .unwrap();

    assert_eq!(report.units, width * height);
    assert!(report.peak_backlog >= 1);
    assert!(
        report.peak_backlog <= capacity + parallelism,
        "backlog reached {}",
        report.peak_backlog
    );
    assert_eq!(canvas.0.get(Pixel(0, 0)), frame.color_at(Pixel(0, 0)));
}

#[test]
fn larger_queues_allow_more_backlog_but_stay_bounded() {
    let frame = Frame::new(ComplexPlane::default(), 20, 100, Palette::default()).unwrap();
    let (width, height) = (frame.plane.width(), frame.plane.height());
    let canvas = SlowCanvas(PixelBuffer::new(width, height, Color::BLACK));

    let report = PoolScheduler::new(2, 10).run(&frame, &canvas).unwrap();
    assert!(report.peak_backlog <= 12, "backlog reached {}", report.peak_backlog);
}

#[test]
fn backlog_is_sampled_once_per_queue_length() {
    let frame = Frame::new(ComplexPlane::default(), 20, 100, Palette::default()).unwrap();
    let (width, height) = (frame.plane.width(), frame.plane.height());
    let canvas = SlowCanvas(PixelBuffer::new(width, height, Color::BLACK));

    let report = PoolScheduler::new(1, 4).run(&frame, &canvas).unwrap();
    assert_eq!(report.units, width * height);
    assert!(report.peak_backlog >= 1);
    assert!(report.peak_backlog <= 5, "backlog reached {}", report.peak_backlog);
}
