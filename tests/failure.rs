use mandelbrot::grid::GridScheduler;
use mandelbrot::pool::PoolScheduler;
use mandelbrot::render::Frame;
use mandelbrot::scheduler::Scheduler;
use mandelbrot::{Canvas, Color, ComplexPlane, Error, Palette, Pixel};

/// Refuses to paint one particular pixel.
struct BrokenCanvas {
    width: usize,
    height: usize,
    bad: Pixel,
}

impl Canvas for BrokenCanvas {
    fn width(&self) -> usize {
        self.width
    }

    fn height(&self) -> usize {
        self.height
    }

    fn set(&self, pixel: Pixel, _color: Color) {
        if pixel == self.bad {
            panic!("cannot paint {:?}", pixel);
        }
    }
}

fn setup() -> (Frame, BrokenCanvas) {
    let frame = Frame::new(ComplexPlane::default(), 50, 100, Palette::default()).unwrap();
    let canvas = BrokenCanvas {
        width: frame.plane.width(),
        height: frame.plane.height(),
        bad: Pixel(17, 9),
    };
    (frame, canvas)
}

#[test]
fn panicking_tile_abandons_the_render() {
    let (frame, canvas) = setup();
    match GridScheduler::new(4).run(&frame, &canvas) {
        Err(Error::WorkerPanicked(_)) => {}
        other => panic!("expected a worker failure, got {:?}", other),
    }
}

#[test]
fn panicking_pool_worker_abandons_the_render() {
    let (frame, canvas) = setup();
    match PoolScheduler::new(3, 4).run(&frame, &canvas) {
        Err(Error::WorkerPanicked(_)) => {}
        other => panic!("expected a worker failure, got {:?}", other),
    }
}

#[test]
fn losing_the_whole_pool_does_not_hang() {
    let (frame, canvas) = setup();
    assert!(PoolScheduler::new(1, 1).run(&frame, &canvas).is_err());
}
