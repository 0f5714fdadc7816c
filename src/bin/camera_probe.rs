use hand_pointer::estimator::SimulatedHand;
use hand_pointer::source::{CameraSource, ObservationSource};

fn main() {
    println!("Testing camera access...\n");

    match nokhwa::query(nokhwa::utils::ApiBackend::Auto) {
        Ok(cameras) => {
            println!("Found {} camera(s):", cameras.len());
            for camera in &cameras {
                println!("  [{}] {}", camera.index(), camera.human_name());
            }
        }
        Err(e) => println!("✗ Failed to query cameras: {}", e),
    }

    let index = std::env::args()
        .nth(1)
        .and_then(|arg| arg.parse().ok())
        .unwrap_or(0);

    // Only checks capture; the hands reported below are scripted, not detected.
    match CameraSource::new(index, Box::new(SimulatedHand::new())) {
        Ok(mut source) => {
            println!("✓ Stream opened: {}", source.name());
            println!("  (landmarks come from the scripted hand, not the image)");
            match source.next_observation() {
                Ok(Some(obs)) => println!("✓ Frame captured at {}x{}", obs.width, obs.height),
                Ok(None) => println!("✗ Camera returned no frame"),
                Err(e) => println!("✗ Failed to capture frame: {:#}", e),
            }
        }
        Err(e) => {
            println!("✗ Failed to open camera {}: {:#}", index, e);
            println!("\nPossible causes:");
            println!("1. Camera is being used by another app");
            println!("2. Camera permissions not granted");
            println!("3. No camera connected");
        }
    }
}
