//! Shared definitions for benchmarks run under both criterion and
//! iai_callgrind.

/// A benchmark parametrised by the number of particles in the event.
pub trait SizedBenchmark: Sized {
    /// Name of the benchmark group.
    fn name() -> &'static str;

    /// Event sizes to benchmark.
    fn sizes() -> &'static [usize] {
        &[100, 1_000, 10_000]
    }

    /// Prepare the benchmark for an event with `size` particles.
    fn setup(size: usize) -> Self;

    /// Operation to measure.
    ///
    /// The returned value is dropped inside the measurement.
    fn run(&self) -> impl Sized;

    /// Setup with the smallest of the benchmarked sizes, for iai_callgrind.
    fn small() -> Self {
        Self::setup(Self::sizes().iter().min().copied().unwrap())
    }

    /// Setup with the largest of the benchmarked sizes, for iai_callgrind.
    fn big() -> Self {
        Self::setup(Self::sizes().iter().max().copied().unwrap())
    }

    /// Run the benchmark under criterion, once per size.
    fn criterion(c: &mut criterion::Criterion) {
        let mut g = c.benchmark_group(Self::name());
        g.plot_config(
            criterion::PlotConfiguration::default()
                .summary_scale(criterion::AxisScale::Logarithmic),
        );

        for &size in Self::sizes() {
            let benchmark = Self::setup(size);
            g.bench_function(criterion::BenchmarkId::new(Self::name(), size), |b| {
                b.iter(|| criterion::black_box(benchmark.run()))
            });
        }
        g.finish();
    }
}

/// A sized benchmark whose operation consumes a fresh state on every
/// iteration, such as a graph that gets simplified in place.
pub trait SizedBenchmarkWithInput: Sized {
    /// State consumed by a single run.
    type State;

    /// Name of the benchmark group.
    fn name() -> &'static str;

    /// Event sizes to benchmark.
    fn sizes() -> &'static [usize] {
        &[100, 1_000, 10_000]
    }

    /// Prepare the benchmark for an event with `size` particles.
    fn setup(size: usize) -> Self;

    /// Build the state for a single run. Not measured.
    fn prepare_run(&self) -> Self::State;

    /// Operation to measure.
    ///
    /// The returned value is dropped inside the measurement.
    fn run(&self, state: Self::State) -> impl Sized;

    /// Setup and state with the smallest of the benchmarked sizes, for
    /// iai_callgrind.
    fn small() -> (Self, Self::State) {
        let size = Self::sizes().iter().min().copied().unwrap();
        let benchmark = Self::setup(size);
        let state = benchmark.prepare_run();
        (benchmark, state)
    }

    /// Setup and state with the largest of the benchmarked sizes, for
    /// iai_callgrind.
    fn big() -> (Self, Self::State) {
        let size = Self::sizes().iter().max().copied().unwrap();
        let benchmark = Self::setup(size);
        let state = benchmark.prepare_run();
        (benchmark, state)
    }

    /// Run the benchmark under criterion, once per size.
    fn criterion(c: &mut criterion::Criterion) {
        let mut g = c.benchmark_group(Self::name());
        g.plot_config(
            criterion::PlotConfiguration::default()
                .summary_scale(criterion::AxisScale::Logarithmic),
        );

        for &size in Self::sizes() {
            let benchmark = Self::setup(size);
            g.bench_function(criterion::BenchmarkId::new(Self::name(), size), |b| {
                b.iter_batched(
                    || benchmark.prepare_run(),
                    |state| criterion::black_box(benchmark.run(state)),
                    criterion::BatchSize::SmallInput,
                )
            });
        }
        g.finish();
    }
}

/// Define an iai_callgrind benchmark function for a [`SizedBenchmark`],
/// with a `small` and a `big` instance.
///
/// `$namespace` names the generated function, to be listed in
/// `iai_callgrind::library_benchmark_group!`.
macro_rules! sized_iai_benchmark {
    ($namespace:ident, $sized_benchmark:path) => {
        #[iai_callgrind::library_benchmark]
        #[bench::small($sized_benchmark::small())]
        #[bench::big($sized_benchmark::big())]
        fn $namespace(benchmark: impl crate::helpers::traits::SizedBenchmark) {
            criterion::black_box(benchmark.run());
        }
    };
}
pub(crate) use sized_iai_benchmark;

/// Define an iai_callgrind benchmark function for a
/// [`SizedBenchmarkWithInput`], with a `small` and a `big` instance.
///
/// `$namespace` names the generated function, to be listed in
/// `iai_callgrind::library_benchmark_group!`.
macro_rules! sized_iai_benchmark_with_input {
    ($namespace:ident, $sized_benchmark:path) => {
        #[iai_callgrind::library_benchmark]
        #[bench::small($sized_benchmark::small())]
        #[bench::big($sized_benchmark::big())]
        fn $namespace<Bench: crate::helpers::traits::SizedBenchmarkWithInput>(
            benchmark: (Bench, Bench::State),
        ) {
            let (benchmark, state) = benchmark;
            criterion::black_box(benchmark.run(state));
        }
    };
}
pub(crate) use sized_iai_benchmark_with_input;
