/// Example walking through the reduction API
///
/// Reduces a few textbook cells, shows the change of basis that relates the input and
/// reduced bases, and runs the bounded minimum reduction on a boundary lattice.
use cell_reduction::reduction::ReductionEngine;
use cell_reduction::{
    is_buerger_cell, is_niggli_cell, minimum_reduction, niggli_reduction, ChangeOfBasis, UnitCell,
};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("=== Niggli Reduction of Unit Cells ===\n");

    // Example 1: a cell that is already reduced
    println!("1. Cubic cell:");
    let cubic = UnitCell::from_parameters([10.0, 10.0, 10.0, 90.0, 90.0, 90.0])?;
    let result = niggli_reduction(&cubic, None, None)?;
    println!("   Reduced (A, B, C, D, E, F): {:?}", result.values());
    println!("   Change of basis: {}\n", result.change_of_basis());

    // Example 2: the 60° hexagonal setting is flipped to 120°
    println!("2. Hexagonal cell given with gamma = 60°:");
    let hexagonal = UnitCell::from_parameters([3.0, 3.0, 5.0, 90.0, 90.0, 60.0])?;
    let result = niggli_reduction(&hexagonal, None, None)?;
    let (_, _, gamma) = result.as_unit_cell()?.angles();
    println!("   Reduced gamma: {:.3}°", gamma);
    println!("   Change of basis: {}\n", result.change_of_basis());

    // Example 3: an oblique basis of a triclinic lattice
    println!("3. Triclinic lattice in a skewed basis:");
    let triclinic = UnitCell::from_parameters([4.2, 5.1, 6.3, 81.0, 97.5, 102.25])?;
    let skewed = triclinic.change_basis(&ChangeOfBasis::from_rows([[1, 2, 0], [0, 1, 0], [1, 1, 1]]))?;
    let [a, b, c, alpha, beta, gamma] = skewed.parameters();
    println!(
        "   Input: a={:.3}, b={:.3}, c={:.3}, α={:.3}, β={:.3}, γ={:.3}",
        a, b, c, alpha, beta, gamma
    );
    println!(
        "   Buerger: {}, Niggli: {}",
        is_buerger_cell(&skewed, None),
        is_niggli_cell(&skewed, None)
    );
    let result = niggli_reduction(&skewed, None, None)?;
    let reduced = result.as_unit_cell()?;
    let [a, b, c, alpha, beta, gamma] = reduced.parameters();
    println!(
        "   Reduced: a={:.3}, b={:.3}, c={:.3}, α={:.3}, β={:.3}, γ={:.3}",
        a, b, c, alpha, beta, gamma
    );
    println!(
        "   {} actions in {} steps, volume {:.3} -> {:.3}",
        result.n_actions(),
        result.n_steps(),
        skewed.volume(),
        reduced.volume()
    );
    println!("   Change of basis: {}", result.change_of_basis());
    println!("   Inverse: {}\n", result.inverse_change_of_basis()?);

    // Example 4: stepping the engine by hand
    println!("4. Stepping the engine:");
    let mut engine = ReductionEngine::new(&skewed, None);
    while engine.step()? {
        println!("   step {:>2}: {:?}", engine.n_steps(), engine.state().values());
    }
    println!("   converged after {} steps\n", engine.n_steps());

    // Example 5: minimum reduction on a lattice sitting on the A8 boundary
    println!("5. Body-centred cubic primitive cell (minimum reduction):");
    let bcc = UnitCell::from_metrical_matrix([1.0, 1.0, 1.0, -1.0 / 3.0, -1.0 / 3.0, -1.0 / 3.0])?;
    let result = minimum_reduction(&bcc, None, None)?;
    println!("   Reduced: {:?}", result.values());
    println!("   Termination: {:?}", result.termination());

    Ok(())
}
