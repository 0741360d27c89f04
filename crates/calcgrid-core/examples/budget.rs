//! Build a tiny budget sheet and print both views.

use calcgrid_core::{Position, Sheet};

fn set(sheet: &mut Sheet, a1: &str, text: &str) {
    sheet
        .set_cell(Position::from_a1(a1).unwrap(), text)
        .unwrap();
}

fn main() -> std::io::Result<()> {
    let mut sheet = Sheet::new();
    set(&mut sheet, "A1", "'rent");
    set(&mut sheet, "B1", "1200");
    set(&mut sheet, "A2", "'food");
    set(&mut sheet, "B2", "450");
    set(&mut sheet, "A3", "'total");
    set(&mut sheet, "B3", "=B1+B2");
    set(&mut sheet, "C3", "=B3/30");

    println!("values:");
    sheet.print_values(&mut std::io::stdout())?;
    println!("texts:");
    sheet.print_texts(&mut std::io::stdout())?;
    Ok(())
}
