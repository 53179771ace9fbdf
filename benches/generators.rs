use criterion::{criterion_group, criterion_main, BatchSize, Criterion};
use rand::SeedableRng;
use rand_xorshift::XorShiftRng;
use sketchgrid::{
    cells::Cartesian2DCoordinate,
    generators,
    grids::{hex_grid, square_grid, MediumHexGrid, MediumSquareGrid},
    units::{ColumnLength, RowLength},
    vec2::Vec2,
};

fn square_32() -> MediumSquareGrid {
    square_grid(Vec2::ZERO, RowLength(32), ColumnLength(32), 10.0).unwrap()
}

fn hex_32() -> MediumHexGrid {
    hex_grid(Vec2::ZERO, RowLength(32), ColumnLength(32), 10.0).unwrap()
}

fn bench_recursive_backtracker_square_32_u16(c: &mut Criterion) {
    let mut rng = XorShiftRng::seed_from_u64(1);
    c.bench_function("recursive_backtracker_square_32_u16", move |b| {
        b.iter_batched(square_32,
                       |mut g| generators::recursive_backtracker(&mut g, Cartesian2DCoordinate::new(0, 0), &mut rng),
                       BatchSize::SmallInput)
    });
}

fn bench_recursive_backtracker_hex_32_u16(c: &mut Criterion) {
    let mut rng = XorShiftRng::seed_from_u64(1);
    c.bench_function("recursive_backtracker_hex_32_u16", move |b| {
        b.iter_batched(hex_32,
                       |mut g| generators::recursive_backtracker(&mut g, Cartesian2DCoordinate::new(0, 0), &mut rng),
                       BatchSize::SmallInput)
    });
}

fn bench_carve_rooms_32_u16(c: &mut Criterion) {
    let mut rng = XorShiftRng::seed_from_u64(1);
    c.bench_function("carve_rooms_32_u16", move |b| {
        b.iter_batched(square_32,
                       |mut g| generators::carve_rooms(&mut g, 5, 3, &mut rng),
                       BatchSize::SmallInput)
    });
}

criterion_group!(
    benches,
    bench_recursive_backtracker_square_32_u16,
    bench_recursive_backtracker_hex_32_u16,
    bench_carve_rooms_32_u16
);
criterion_main!(benches);
