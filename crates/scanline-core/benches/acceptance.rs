use criterion::{black_box, criterion_group, criterion_main, Criterion};
use scanline_core::{accept, FramingBounds, Rect, Resolution, ViewfinderGeometry};

fn bench_accept(c: &mut Criterion) {
    let screen = Resolution::new(1920, 1080);
    let preview = Resolution::new(1600, 1024);
    let vf = ViewfinderGeometry::for_screen(screen, &FramingBounds::default());
    let detections: Vec<Rect> = (0..256)
        .map(|i| {
            let x = (i * 7) % 1200;
            let y = (i * 13) % 900;
            Rect::new(x, y, x + 300, y + 120)
        })
        .collect();

    c.bench_function("accept_256_detections", |b| {
        b.iter(|| {
            detections
                .iter()
                .filter(|det| {
                    accept(
                        Some(black_box(screen)),
                        Some(&vf.rect),
                        Some(black_box(preview)),
                        Some(det),
                        vf.mid_y,
                    )
                })
                .count()
        })
    });

    c.bench_function("viewfinder_geometry", |b| {
        b.iter(|| ViewfinderGeometry::for_screen(black_box(screen), &FramingBounds::default()))
    });
}

criterion_group!(benches, bench_accept);
criterion_main!(benches);
