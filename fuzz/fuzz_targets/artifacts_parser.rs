#![no_main]

use arranque::audit::BootupTimeAudit;
use arranque::taxonomy::Taxonomy;
use arranque::trace::TraceArtifacts;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if let Ok(input) = std::str::from_utf8(data) {
        // Parsing and auditing must return errors, never panic
        if let Ok(artifacts) = TraceArtifacts::from_json_str(input) {
            if let Ok(taxonomy) = Taxonomy::default_taxonomy() {
                let _ = BootupTimeAudit::with_defaults(taxonomy).audit(&artifacts);
            }
        }
    }
});
