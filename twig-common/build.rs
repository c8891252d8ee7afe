use std::{
    env,
    fs::File,
    io::{BufRead, BufReader},
    path::Path,
};

/// Generates the static set of interned names (tag kinds, attribute names, event names) that are
/// known at compile time. Everything else is interned dynamically.
fn generate_static_atoms() {
    let manifest_dir = env::var("CARGO_MANIFEST_DIR").unwrap();
    let static_atoms_file_path = Path::new(&manifest_dir).join("static_atoms.txt");
    let generated_file_path = Path::new(&env::var("OUT_DIR").unwrap()).join("atoms.rs");

    println!("cargo:rerun-if-changed={}", static_atoms_file_path.display());

    let mut atom_ty = string_cache_codegen::AtomType::new("atoms::Atom", "atom!");
    let file = File::open(&static_atoms_file_path).unwrap();
    for line in BufReader::new(file).lines() {
        let line = line.unwrap();
        let name = line.trim();
        if name.is_empty() || name.starts_with('#') {
            continue;
        }
        atom_ty.atom(name);
    }
    atom_ty
        .with_macro_doc("Returns the interned name for a string literal from the static name set.")
        .write_to_file(&generated_file_path)
        .unwrap();
}

fn main() {
    generate_static_atoms()
}
