use criterion::{criterion_group, criterion_main, Criterion};
use quote_calendar::calendar;
use quote_calendar::models::quote::truncate_quote;
use std::hint::black_box;

fn benchmark_calendar_grid(c: &mut Criterion) {
    let mut group = c.benchmark_group("calendar_grid");

    group.bench_function("single_month", |b| {
        b.iter(|| calendar::calendar_grid(black_box(2024), black_box(1)))
    });

    // A full year of navigation, as a user paging back through the calendar.
    group.bench_function("year_of_months", |b| {
        b.iter(|| {
            let mut year = 2025;
            let mut month = 0;
            for _ in 0..12 {
                let grid = calendar::calendar_grid(year, month).expect("valid month");
                black_box(grid);
                let prev = calendar::navigation_months(year, month).prev;
                year = prev.year;
                month = prev.month;
            }
        })
    });

    group.finish();
}

fn benchmark_date_arithmetic(c: &mut Criterion) {
    c.bench_function("add_days_across_leap_day", |b| {
        b.iter(|| calendar::add_days(black_box("2024-02-28"), black_box(2)))
    });

    c.bench_function("parse_date", |b| {
        b.iter(|| calendar::parse_date(black_box("2023-12-31")))
    });
}

fn benchmark_truncate(c: &mut Criterion) {
    let text = "The only way to do great work is to love what you do. \
                If you haven't found it yet, keep looking. Don't settle.";
    c.bench_function("truncate_quote_preview", |b| {
        b.iter(|| truncate_quote(black_box(text), black_box(50)))
    });
}

criterion_group!(
    benches,
    benchmark_calendar_grid,
    benchmark_date_arithmetic,
    benchmark_truncate
);
criterion_main!(benches);
