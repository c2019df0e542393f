//! Cursor engine benchmarks: edits and movement over many cursors.

use std::hint::black_box;

use criterion::{BatchSize, Criterion, criterion_group, criterion_main};
use multicursor::{
    Command, CursorEngine, Direction, GridLayout, Granularity, Host, RopeBuffer, TextRange,
    Towards, UndoStack,
};
use rand::{Rng, SeedableRng, rngs::StdRng};

/// Lines in the generated document.
const LINES: usize = 2_000;

/// A document of short random words.
fn sample_text(rng: &mut StdRng) -> String {
    let mut text = String::new();
    for _ in 0..LINES {
        let words = rng.random_range(3..12);
        for w in 0..words {
            if w > 0 {
                text.push(' ');
            }
            let len = rng.random_range(1..9);
            text.extend((0..len).map(|_| rng.random_range(b'a'..=b'z') as char));
        }
        text.push('\n');
    }
    text
}

/// Random caret offsets into a document of `len` chars.
fn sample_carets(rng: &mut StdRng, len: usize, count: usize) -> Vec<TextRange> {
    (0..count)
        .map(|_| TextRange::caret(rng.random_range(0..=len)))
        .collect()
}

/// Buffer, layout, history and engine for one benchmark iteration.
struct Setup {
    /// Text storage.
    buffer: RopeBuffer,
    /// Grid layout.
    layout: GridLayout,
    /// Undo history.
    undo: UndoStack,
    /// Engine with the sampled cursors.
    engine: CursorEngine,
}

impl Setup {
    /// Build a document with the given carets.
    fn new(text: &str, carets: &[TextRange]) -> Self {
        let mut setup = Self {
            buffer: RopeBuffer::new(text),
            layout: GridLayout::new(),
            undo: UndoStack::new(),
            engine: CursorEngine::new(),
        };
        let host = Host::new(&mut setup.buffer, &mut setup.layout, &mut setup.undo);
        setup.engine.set_ranges(&host, carets.iter().copied());
        drop(host);
        setup
    }

    /// Run one command.
    fn perform(&mut self, command: &Command) -> bool {
        let mut host = Host::new(&mut self.buffer, &mut self.layout, &mut self.undo);
        self.engine.perform(&mut host, command).changed
    }
}

/// Benchmark typing and deleting at many carets.
fn benchmark_edits(c: &mut Criterion) {
    let mut rng = StdRng::seed_from_u64(7);
    let text = sample_text(&mut rng);
    let len = text.chars().count();
    let carets = sample_carets(&mut rng, len, 500);

    let insert = Command::InsertText("xy".into());
    c.bench_function("insert_500_carets", |b| {
        b.iter_batched(
            || Setup::new(&text, &carets),
            |mut setup| black_box(setup.perform(&insert)),
            BatchSize::LargeInput,
        );
    });

    let delete = Command::Delete(Towards::Start, Granularity::Word);
    c.bench_function("delete_word_500_carets", |b| {
        b.iter_batched(
            || Setup::new(&text, &carets),
            |mut setup| black_box(setup.perform(&delete)),
            BatchSize::LargeInput,
        );
    });
}

/// Benchmark movement and extension at many carets.
fn benchmark_movement(c: &mut Criterion) {
    let mut rng = StdRng::seed_from_u64(11);
    let text = sample_text(&mut rng);
    let len = text.chars().count();
    let carets = sample_carets(&mut rng, len, 500);

    let mut setup = Setup::new(&text, &carets);
    let word = Command::Translate(Direction::Right, Granularity::Word);
    c.bench_function("translate_word_500_carets", |b| {
        b.iter(|| black_box(setup.perform(&word)));
    });

    let down = Command::Extend(Direction::Down, Granularity::Character);
    c.bench_function("extend_down_500_carets", |b| {
        b.iter_batched(
            || Setup::new(&text, &carets),
            |mut setup| black_box(setup.perform(&down)),
            BatchSize::LargeInput,
        );
    });
}

criterion_group! {
    name = benches;
    config = Criterion::default().sample_size(10);
    targets = benchmark_edits, benchmark_movement
}
criterion_main!(benches);
