use criterion::{black_box, criterion_group, criterion_main, Criterion};

use slider_search::{BoardState, CostCalculator, Puzzle, Search, Strategy};

const EXAMPLE_INPUT: &str = "
_ 1 3
8 2 6
4 5 7";

const HARDER_INPUT: &str = "
8 6 7
2 5 4
3 _ 1";

fn criterion_bench(c: &mut Criterion) {
    let goal = BoardState::goal(3).unwrap();

    c.bench_function("breadth first", |b| {
        let input = Puzzle::new(EXAMPLE_INPUT.parse().unwrap());
        b.iter(|| {
            Search::new(&goal, CostCalculator::PathLength)
                .solve(black_box(&input), &mut Strategy::breadth_first())
                .unwrap()
        })
    });

    c.bench_function("bidirectional", |b| {
        let input = Puzzle::new(HARDER_INPUT.parse().unwrap());
        b.iter(|| {
            Search::new(&goal, CostCalculator::PathLength)
                .solve(black_box(&input), &mut Strategy::bidirectional())
                .unwrap()
        })
    });

    for calculator in [
        CostCalculator::Manhattan,
        CostCalculator::ManhattanInversions,
        CostCalculator::GreedyManhattan,
        CostCalculator::MisplacedTiles,
    ] {
        c.bench_function(calculator.name(), |b| {
            let input = Puzzle::new(HARDER_INPUT.parse().unwrap());
            b.iter(|| {
                Search::new(&goal, calculator)
                    .solve(black_box(&input), &mut Strategy::cost_guided())
                    .unwrap()
            })
        });
    }
}

criterion_group!(benches, criterion_bench);
criterion_main!(benches);
