//! Integration tests for lift-output.

#[cfg(test)]
mod csv_tests {
    use tempfile::TempDir;

    use crate::csv::CsvWriter;
    use crate::row::{CompletionRow, PolicyRow, UnitSnapshotRow};
    use crate::writer::OutputWriter;

    fn tmp() -> TempDir {
        tempfile::tempdir().expect("create temp dir")
    }

    fn snap_row(unit_id: u32, tick: u64) -> UnitSnapshotRow {
        UnitSnapshotRow {
            tick,
            elapsed_ms:    tick * 100,
            unit_id,
            floor:         unit_id * 4,
            phase:         "idle".to_owned(),
            busy:          false,
            queue_len:     0,
            served:        0,
            avg_wait_secs: 0.0,
            distance_m:    0.0,
        }
    }

    fn completion_row(request_id: u64) -> CompletionRow {
        CompletionRow {
            request_id,
            unit_id:       0,
            origin:        2,
            destination:   8,
            party_size:    2,
            created_tick:  0,
            finished_tick: 66,
            travel_secs:   110.0,
        }
    }

    fn read_rows(path: std::path::PathBuf) -> Vec<csv::StringRecord> {
        let mut rdr = csv::Reader::from_path(path).unwrap();
        rdr.records().map(|r| r.unwrap()).collect()
    }

    #[test]
    fn csv_files_created() {
        let dir = tmp();
        let _w = CsvWriter::new(dir.path()).unwrap();
        assert!(dir.path().join("unit_snapshots.csv").exists());
        assert!(dir.path().join("completions.csv").exists());
        assert!(dir.path().join("comparison.csv").exists());
    }

    #[test]
    fn csv_headers_correct() {
        let dir = tmp();
        let mut w = CsvWriter::new(dir.path()).unwrap();
        w.finish().unwrap();

        let mut rdr = csv::Reader::from_path(dir.path().join("unit_snapshots.csv")).unwrap();
        let headers: Vec<_> = rdr.headers().unwrap().iter().map(str::to_owned).collect();
        assert_eq!(
            headers,
            [
                "tick", "elapsed_ms", "unit_id", "floor", "phase", "busy", "queue_len", "served",
                "avg_wait_secs", "distance_m",
            ]
        );

        let mut rdr2 = csv::Reader::from_path(dir.path().join("completions.csv")).unwrap();
        let headers2: Vec<_> = rdr2.headers().unwrap().iter().map(str::to_owned).collect();
        assert_eq!(
            headers2,
            [
                "request_id", "unit_id", "origin", "destination", "party_size", "created_tick",
                "finished_tick", "travel_secs",
            ]
        );

        let mut rdr3 = csv::Reader::from_path(dir.path().join("comparison.csv")).unwrap();
        let headers3: Vec<_> = rdr3.headers().unwrap().iter().map(str::to_owned).collect();
        assert_eq!(headers3, ["policy", "requests", "total_wait_secs", "avg_wait_secs"]);
    }

    #[test]
    fn csv_snapshot_round_trip() {
        let dir = tmp();
        let mut w = CsvWriter::new(dir.path()).unwrap();
        let mut busy = snap_row(2, 5);
        busy.busy = true;
        busy.phase = "to pickup @3".to_owned();
        busy.distance_m = 12.0;
        w.write_snapshots(&[snap_row(0, 5), snap_row(1, 5), busy]).unwrap();
        w.finish().unwrap();

        let rows = read_rows(dir.path().join("unit_snapshots.csv"));
        assert_eq!(rows.len(), 3);
        assert_eq!(&rows[0][0], "5");   // tick
        assert_eq!(&rows[0][1], "500"); // elapsed_ms
        assert_eq!(&rows[1][2], "1");   // unit_id
        assert_eq!(&rows[2][3], "8");   // floor
        assert_eq!(&rows[2][4], "to pickup @3");
        assert_eq!(&rows[2][5], "1");   // busy
        assert_eq!(&rows[0][5], "0");
        assert_eq!(&rows[2][9], "12.0");
    }

    #[test]
    fn csv_completion_round_trip() {
        let dir = tmp();
        let mut w = CsvWriter::new(dir.path()).unwrap();
        w.write_completion(&completion_row(7)).unwrap();
        w.finish().unwrap();

        let rows = read_rows(dir.path().join("completions.csv"));
        assert_eq!(rows.len(), 1);
        assert_eq!(&rows[0][0], "7");       // request_id
        assert_eq!(&rows[0][2], "2");       // origin
        assert_eq!(&rows[0][3], "8");       // destination
        assert_eq!(&rows[0][6], "66");      // finished_tick
        assert_eq!(&rows[0][7], "110.000"); // travel_secs
    }

    #[test]
    fn csv_comparison_round_trip() {
        let dir = tmp();
        let mut w = CsvWriter::new(dir.path()).unwrap();
        w.write_comparison(&[
            PolicyRow { policy: "weighted-factor", requests: 2, total_wait_secs: 150.0, avg_wait_secs: 75.0 },
            PolicyRow { policy: "rotating", requests: 0, total_wait_secs: 0.0, avg_wait_secs: 0.0 },
        ])
        .unwrap();
        w.finish().unwrap();

        let rows = read_rows(dir.path().join("comparison.csv"));
        assert_eq!(rows.len(), 2);
        assert_eq!(&rows[0][0], "weighted-factor");
        assert_eq!(&rows[0][3], "75.000");
        assert_eq!(&rows[1][1], "0");
    }

    #[test]
    fn csv_finish_idempotent() {
        let dir = tmp();
        let mut w = CsvWriter::new(dir.path()).unwrap();
        w.finish().unwrap();
        w.finish().unwrap();
    }

    #[test]
    fn csv_empty_snapshot_ok() {
        let dir = tmp();
        let mut w = CsvWriter::new(dir.path()).unwrap();
        w.write_snapshots(&[]).unwrap();
    }

    #[test]
    fn csv_missing_dir_is_io_error() {
        let dir = tmp();
        let missing = dir.path().join("does-not-exist");
        assert!(CsvWriter::new(&missing).is_err());
    }

    #[test]
    fn integration_csv() {
        use lift_core::SimConfig;
        use lift_sim::SimBuilder;

        use crate::observer::SimOutputObserver;

        let mut config = SimConfig::default();
        config.total_ticks = 300;
        config.output_interval_ticks = 100;

        let mut sim = SimBuilder::new(config.clone()).build().unwrap();
        sim.submit(2, 8, 2).unwrap();

        let dir = tmp();
        let writer = CsvWriter::new(dir.path()).unwrap();
        let mut obs = SimOutputObserver::new(writer, &config);
        sim.run(&mut obs);
        assert!(obs.take_error().is_none(), "no write errors expected");
        assert_eq!(obs.completions(), 1);

        // Snapshots at ticks 0, 100, 200 for three units.
        let snaps = read_rows(dir.path().join("unit_snapshots.csv"));
        assert_eq!(snaps.len(), 9, "expected 3 ticks × 3 units = 9 snapshot rows, got {}", snaps.len());
        assert_eq!(&snaps[3][1], "10000"); // tick 100 at 100 ms per tick

        let done = read_rows(dir.path().join("completions.csv"));
        assert_eq!(done.len(), 1);
        assert_eq!(&done[0][1], "0");  // unit 0
        assert_eq!(&done[0][6], "66");

        let table = read_rows(dir.path().join("comparison.csv"));
        let policies: Vec<_> = table.iter().map(|r| r[0].to_owned()).collect();
        assert_eq!(policies, ["weighted-factor", "shortest-queue", "rotating"]);
        assert_eq!(&table[0][2], "110.000");
        assert_eq!(&table[1][2], "330.000");
        assert_eq!(&table[2][2], "220.000");
    }
}
