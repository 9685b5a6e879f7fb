use xcspost_camtools::{Operation, PostConfig, TranscodeError, Transcoder};
use xcspost_core::{parse_program, Axis, MotionCommand, SourceUnits};

fn bare() -> PostConfig {
    PostConfig {
        header: false,
        comments: false,
        preamble: String::new(),
        postamble: String::new(),
        ..PostConfig::default()
    }
}

fn rapid(x: f64, y: f64, z: f64) -> MotionCommand {
    MotionCommand::rapid().at(x, y, z)
}

fn line(x: f64, y: f64, z: f64) -> MotionCommand {
    MotionCommand::linear().at(x, y, z)
}

#[test]
fn test_single_stroke() {
    let commands = vec![
        rapid(0.0, 0.0, 5.0),
        line(0.0, 0.0, -1.0),
        line(5.0, 0.0, -1.0),
        rapid(5.0, 0.0, 5.0),
    ];
    let out = Transcoder::new(bare())
        .transcode(&[Operation::path("stroke", commands)])
        .unwrap();

    assert_eq!(out.paths.len(), 1);
    let path = &out.paths[0];
    assert_eq!(path.draw_count(), 1);
    assert_eq!(path.path_markup(), "M 0.000 0.000 L 5.000 0.000");
    let b = path.bounds;
    assert_eq!((b.min_x, b.max_x, b.min_y, b.max_y), (0.0, 5.0, 0.0, 0.0));
}

#[test]
fn test_plunge_without_draw_is_discarded() {
    let commands = vec![
        rapid(0.0, 0.0, 5.0),
        line(0.0, 0.0, -1.0),
        rapid(3.0, 3.0, -1.0),
        rapid(3.0, 3.0, 5.0),
    ];
    let out = Transcoder::new(bare())
        .transcode(&[Operation::path("nothing", commands)])
        .unwrap();
    assert!(out.paths.is_empty());
    assert!(matches!(
        out.build_document("job"),
        Err(TranscodeError::NoCuttableGeometry)
    ));
}

fn three_strokes() -> Vec<MotionCommand> {
    let mut commands = Vec::new();
    for (i, (feed, power)) in [(600.0, 300.0), (1200.0, 500.0), (1800.0, 800.0)]
        .into_iter()
        .enumerate()
    {
        let y = i as f64 * 10.0;
        commands.push(rapid(0.0, y, 5.0));
        commands.push(
            line(0.0, y, -1.0)
                .with(Axis::F, feed)
                .with(Axis::S, power),
        );
        commands.push(line(20.0, y + 5.0, -1.0));
        commands.push(rapid(20.0, y + 5.0, 5.0));
    }
    commands
}

#[test]
fn test_three_strokes() {
    let out = Transcoder::new(bare())
        .transcode(&[Operation::path("cuts", three_strokes())])
        .unwrap();
    assert_eq!(out.paths.len(), 3);
    assert!(out.paths.iter().all(|p| p.tokens[0].starts_with('M')));
    let powers: Vec<i64> = out.paths.iter().map(|p| p.power).collect();
    assert_eq!(powers, vec![300, 500, 800]);
}

#[test]
fn test_document_from_strokes() {
    let out = Transcoder::new(bare())
        .transcode(&[Operation::path("cuts", three_strokes())])
        .unwrap();
    let global = out.global_bounds().unwrap();
    assert_eq!((global.min_x, global.max_x), (0.0, 20.0));
    assert_eq!((global.min_y, global.max_y), (-25.0, 0.0));

    let v = out.build_document("job.gcode").unwrap().encode();
    let displays = v["canvas"][0]["displays"].as_array().unwrap();
    assert_eq!(displays.len(), 3);
    assert_eq!(displays[0]["id"], "path");
    assert_eq!(displays[1]["id"], "path__1");
    assert_eq!(displays[0]["type"], "PATH");
    assert_eq!(displays[0]["groupTag"], "job.gcode");

    // the top-most stroke in display space sits on the origin row
    assert_eq!(displays[2]["x"], 0);
    assert_eq!(displays[2]["y"], 0);
    assert_eq!(displays[0]["y"], 20);
    assert_eq!(displays[0]["width"], 20);
    assert_eq!(displays[0]["height"], 5);

    let entries = v["device"]["data"]["value"][0][1]["displays"]["value"]
        .as_array()
        .unwrap();
    let customize = &entries[1][1]["data"]["VECTOR_CUTTING"]["parameter"]["customize"];
    assert_eq!(customize["power"], 50);
    assert_eq!(customize["speed"], 20);
    assert_eq!(customize["repeat"], 1);
}

#[test]
fn test_program_layout() {
    let config = PostConfig {
        line_numbers: true,
        ..PostConfig::default()
    };
    let ops = vec![Operation::group(
        "job",
        vec![Operation::path("profile", vec![rapid(1.0, 1.0, 5.0)])],
    )];
    let out = Transcoder::new(config).transcode(&ops).unwrap();
    let lines: Vec<&str> = out.gcode.lines().collect();

    assert_eq!(lines[0], "N110 (Exported by xcspost)");
    assert_eq!(lines[1], "N120 (Post Processor: xcspost)");
    assert!(lines[2].starts_with("N130 (Output Time:"));
    assert_eq!(lines[3], "N140 (begin preamble)");
    assert_eq!(lines[4], "N150 M17 S1");
    assert_eq!(lines[12], "N230 G1 S020");
    assert_eq!(lines[13], "N240 G21");
    assert_eq!(lines[14], "N250 (begin operation: profile)");
    assert_eq!(lines[15], "N260 (machine units: mm/min)");
    assert_eq!(lines[16], "N270 G0 X1.000 Y1.000 Z5.000");
    assert_eq!(lines[17], "N280 (finish operation: profile)");
    assert_eq!(lines[18], "N290 (begin postamble)");
    assert_eq!(lines[19], "N300 G0 X17 Y1");
    assert_eq!(lines[20], "N310 M18");
    assert_eq!(lines.len(), 21);
}

#[test]
fn test_feed_and_power_persist_across_operations() {
    let first = vec![line(0.0, 0.0, 0.0).with(Axis::F, 600.0).with(Axis::S, 400.0)];
    let second = vec![
        rapid(0.0, 0.0, 5.0),
        line(0.0, 0.0, -1.0),
        line(4.0, 0.0, -1.0),
    ];
    let out = Transcoder::new(bare())
        .transcode(&[Operation::path("setup", first), Operation::path("cut", second)])
        .unwrap();
    assert_eq!(out.paths.len(), 1);
    assert_eq!(out.paths[0].power, 400);
    assert_eq!(out.paths[0].feed, 600.0);
}

#[test]
fn test_arc_lines_ignore_modal_and_doubles() {
    let config = PostConfig {
        output_doubles: false,
        modal: true,
        ..bare()
    };
    let commands = vec![
        rapid(0.0, 0.0, 5.0),
        line(0.0, 0.0, -1.0)
            .with(Axis::F, 600.0)
            .with(Axis::S, 500.0),
        line(10.0, 0.0, -1.0),
        MotionCommand::arc_ccw()
            .at(0.0, 10.0, -1.0)
            .with(Axis::I, -10.0)
            .with(Axis::J, 0.0),
        line(0.0, 20.0, -1.0),
        rapid(0.0, 20.0, 5.0),
    ];
    let out = Transcoder::new(config)
        .transcode(&[Operation::path("corner", commands)])
        .unwrap();
    let lines: Vec<&str> = out.gcode.lines().skip(1).collect();

    assert_eq!(lines[0], "G0 X0.000 Y0.000 Z5.000");
    assert_eq!(lines[1], "G1 Z-1.000 F600.000 S500");
    assert_eq!(lines[2], "X10.000");

    let arc_end = lines.len() - 2;
    let arc_lines = &lines[3..arc_end];
    assert!(arc_lines.len() > 2);
    for arc_line in arc_lines {
        assert!(arc_line.starts_with("G1 X"), "{}", arc_line);
        assert!(arc_line.contains(" Y"), "{}", arc_line);
    }
    assert_eq!(*arc_lines.last().unwrap(), "G1 X0.000 Y10.000");

    // after the arc only the changed axis remains, keyword stays modal
    assert_eq!(lines[arc_end], "Y20.000");
    assert_eq!(lines[arc_end + 1], "G0 Z5.000");
}

#[test]
fn test_parsed_program() {
    let text = "G0 X0 Y0 Z5\nG1 Z-1 F300 S1000\nG2 X10 Y0 I5 J0\nG0 Z5\n";
    let commands = parse_program(text, SourceUnits::default()).unwrap();
    let out = Transcoder::new(bare())
        .transcode(&[Operation::path("circle", commands)])
        .unwrap();
    assert_eq!(out.paths.len(), 1);
    let path = &out.paths[0];
    // exact half turn: collinear radii take the large-arc branch
    assert_eq!(path.tokens[1], "A 5.000 5.000 0 1 1 10.000 0.000");
    let b = path.bounds;
    // CW half circle from (0,0) over the top of center (5,0), mirrored
    assert_eq!((b.min_x, b.max_x, b.min_y, b.max_y), (0.0, 10.0, -5.0, 0.0));
    assert!(out.gcode.lines().any(|l| l == "G1 X10.000 Y0.000"));
}
