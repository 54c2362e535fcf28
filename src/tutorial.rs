//! The built-in tutorial song.

/// A song that walks through every construct of the notation. Loading it
/// replaces the current song.
pub const TUTORIAL: &str = r#"// comments start with //


// Play some notes

C C# D D#
E F F# G
G# A5 A#5 B5



// _ for a rest
_ _ _ _



// Octave is 4 by default

C C4 C C4
_ _ _ _



// add ~ to hold notes longer
// following notes will overlap unless you add rests

C~~~ _ _ _  _ _ _ _
G3~~~~~ _ B~~~~ _ D~~~ _ F~ _
C~~~ _ _ _  _ _ _ _



// use - to create chords

G#~~~-B5~~~-E5~~~ ___
F#~~~-B5~~~ ___
G#~~~-C#5~~~-E5~~~ ___
A5~~~-C#5~~~-E5~~~ ___



// Repeat sections by surrounding them with |: and :|

|: A4~~ _ _ F3~~ _ _ G3~~ _ _ C3~~ _ _
C3~~ _ _ G3~~ _ _ A4~~ _ _ F3~~ _ _ :|



// Repeated sections can be nested

|:
|: |: G#-B5-E5  E  :| :|
|: |: F#-B5     B  :| :|
|: |: G#-C#5-E5 C# :| :|
|: |: A5-C#5-E5 A  :| :|
                      :|


// You can change the wave type

sine
C E G _

sawtooth
C E G _

square
C E G _

triangle
C E G _



// And finally, you can halt the autoplay with a double bar ||

C  E  G  C5
C5 E5 G5 C6 ||



// Click any of the squares to play that note.

sawtooth

C~~~   E~~   G~    B5
F~~~   A5#~~ C5~   E5
G~~~   B5~~  D5~   G6

C5~~~~-E~~~~-G~~~~ _ _ _

sine

C~~~   E~~   G~    B5
F~~~   A5#~~ C5~   E5
G~~~   B5~~  D5~   G6

C5~~~~-E~~~~-G~~~~ _ _ _

// If you don't put a halt at the end, it will loop forever
||
"#;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::{Directive, WaveType};
    use crate::lexer::Grammar;
    use crate::parser::{parse_song, parse_song_with_diagnostics};

    #[test]
    fn tutorial_parses() {
        let song = parse_song(TUTORIAL, Grammar::default());
        assert!(song.len() > 100);
        assert_eq!(song.first().map(|d| d.to_string()).as_deref(), Some("C4"));
        assert_eq!(song.last(), Some(&Directive::Halt));
    }

    #[test]
    fn tutorial_uses_every_wave() {
        let song = parse_song(TUTORIAL, Grammar::default());
        for wave in WaveType::ALL {
            assert!(song.contains(&Directive::Voice { wave }), "missing {wave}");
        }
    }

    #[test]
    fn tutorial_brackets_balance() {
        let song = parse_song(TUTORIAL, Grammar::default());
        let opens = song.iter().filter(|d| **d == Directive::BeginRepeat).count();
        let closes = song.iter().filter(|d| **d == Directive::EndRepeat).count();
        assert_eq!(opens, closes);
    }

    #[test]
    fn tutorial_typo_is_reported() {
        // `A5#~~` puts the sharp after the octave; only `A5` is read.
        let parsed = parse_song_with_diagnostics(TUTORIAL, Grammar::default());
        assert!(parsed.diagnostics.iter().any(|d| &TUTORIAL[d.span.start..d.span.end] == "#~~"));
    }
}
