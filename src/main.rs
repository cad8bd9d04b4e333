fn main() -> Result<(), eframe::Error> {
    // Set up logging; RUST_LOG=diagram_editor=debug shows engine diagnostics
    env_logger::init();

    // Run the diagram editor application
    diagram_editor::run_app()
}
