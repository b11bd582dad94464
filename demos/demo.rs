use rummy_solver::solver::find_best_move;
use rummy_solver::TileCollection;

fn main() {
    let hand: TileCollection = "u2.u3.u4.y8.y9.y10.k8.u8.r8.y5.r5.u5"
        .parse()
        .expect("demo hand is valid notation");

    println!("Hand: {hand}\n");

    let best = find_best_move(&hand);

    println!("Fewest tiles left:");
    for meld in &best.by_count.melds {
        println!("  play {meld} ({:?})", meld.kind());
    }
    println!(
        "  leftover {} ({} tiles, {} points)\n",
        best.by_count.residual,
        best.by_count.residual.len(),
        best.by_count.residual.point_sum()
    );

    println!("Fewest points left:");
    for meld in &best.by_sum.melds {
        println!("  play {meld} ({:?})", meld.kind());
    }
    println!(
        "  leftover {} ({} tiles, {} points)",
        best.by_sum.residual,
        best.by_sum.residual.len(),
        best.by_sum.residual.point_sum()
    );
}
