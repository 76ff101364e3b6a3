use station_kml::cli;

fn main() {
    cli::run();
}
