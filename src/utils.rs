use crate::board::{Block, Board, Orientation, GOAL_CHAR, GRID_SIZE};

/// Parses an array of string slices into a `Board`.
///
/// Each string slice represents one row of the 6x6 grid, starting from row
/// 0. '.' marks an empty cell; every other valid character is an uppercase
/// letter naming a block, with [`GOAL_CHAR`] ('R') reserved for the goal
/// block. All cells carrying the same letter form one block and must be
/// contiguous in a single row or column, 2 or 3 cells long. Rows shorter
/// than the grid, and missing trailing rows, are treated as empty.
///
/// The format is the inverse of `Board`'s `Display` implementation, so a
/// rendered board parses back to an equivalent board.
///
/// # Arguments
/// * `s`: rows of the board, top to bottom.
///
/// # Returns
/// * `Ok(Board)` with the goal block (if present) assigned id 0 and the
///   remaining blocks assigned ids 1.. in row-major discovery order.
/// * `Err(String)` if the input has too many rows, an over-long row, an
///   unrecognized character, or a letter whose cells do not form a valid
///   block shape.
///
/// # Examples
/// ```
/// use gridlock_solver::utils::board_from_str_array;
///
/// let board = board_from_str_array(&[
///     "......",
///     "..A...",
///     "RRA...",
///     "......",
///     "......",
///     "......",
/// ]).unwrap();
/// assert!(board.goal().is_some());
/// assert_eq!(board.blocks().len(), 2);
/// ```
pub fn board_from_str_array(s: &[&str]) -> Result<Board, String> {
    if s.len() > GRID_SIZE {
        return Err(format!(
            "Invalid number of rows. Expected at most {}, found {}",
            GRID_SIZE,
            s.len()
        ));
    }

    // Letters in row-major discovery order, each with its covered cells.
    let mut order: Vec<char> = Vec::new();
    let mut cells: Vec<Vec<(usize, usize)>> = Vec::new();

    for (r, row_str) in s.iter().enumerate() {
        if row_str.chars().count() > GRID_SIZE {
            return Err(format!(
                "Row {} is too long. Expected at most {} characters, found {}",
                r,
                GRID_SIZE,
                row_str.chars().count()
            ));
        }

        for (c, ch) in row_str.chars().enumerate() {
            if ch == '.' {
                continue;
            }
            if !ch.is_ascii_uppercase() {
                return Err(format!(
                    "Unrecognized character '{}' in row {} col {}",
                    ch, r, c
                ));
            }
            match order.iter().position(|&seen| seen == ch) {
                Some(i) => cells[i].push((r, c)),
                None => {
                    order.push(ch);
                    cells.push(vec![(r, c)]);
                }
            }
        }
    }

    let mut blocks = Vec::with_capacity(order.len());
    let mut next_id = 1u8;
    for (ch, block_cells) in order.iter().zip(&cells) {
        let is_goal = *ch == GOAL_CHAR;
        let id = if is_goal {
            0
        } else {
            let id = next_id;
            next_id += 1;
            id
        };
        blocks.push(block_from_cells(*ch, id, is_goal, block_cells)?);
    }

    Ok(Board::new(blocks))
}

/// Builds one block from the cells sharing a letter, rejecting shapes that
/// are not a straight, contiguous run of 2 or 3 cells.
fn block_from_cells(
    ch: char,
    id: u8,
    is_goal: bool,
    cells: &[(usize, usize)],
) -> Result<Block, String> {
    // Row-major scan order means cells are already sorted.
    if !(2..=3).contains(&cells.len()) {
        return Err(format!(
            "Block '{}' covers {} cells (expected 2 or 3)",
            ch,
            cells.len()
        ));
    }

    let (row, col) = cells[0];
    let horizontal = cells.iter().all(|&(r, _)| r == row);
    let vertical = cells.iter().all(|&(_, c)| c == col);

    let orientation = if horizontal && !vertical {
        if !cells.iter().enumerate().all(|(i, &(_, c))| c == col + i) {
            return Err(format!("Block '{}' is not contiguous", ch));
        }
        Orientation::Horizontal
    } else if vertical && !horizontal {
        if !cells.iter().enumerate().all(|(i, &(r, _))| r == row + i) {
            return Err(format!("Block '{}' is not contiguous", ch));
        }
        Orientation::Vertical
    } else {
        return Err(format!(
            "Block '{}' does not form a straight line",
            ch
        ));
    };

    Ok(Block {
        id,
        row,
        col,
        length: cells.len(),
        orientation,
        is_goal,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::EXIT_ROW;

    #[test]
    fn test_parse_valid_board() {
        let board = board_from_str_array(&[
            "AA..B.",
            "..C.B.",
            "RRC...",
            "..C..D",
            ".....D",
            "EEE..D",
        ])
        .unwrap();
        assert_eq!(board.blocks().len(), 6);

        let goal = board.goal().unwrap();
        assert_eq!(goal.row, EXIT_ROW);
        assert_eq!(goal.col, 0);
        assert_eq!(goal.length, 2);
        assert_eq!(goal.orientation, Orientation::Horizontal);

        let c = board.blocks().iter().find(|b| b.id == 3).unwrap();
        assert_eq!((c.row, c.col, c.length), (1, 2, 3));
        assert_eq!(c.orientation, Orientation::Vertical);

        assert!(board.validate().is_ok());
    }

    #[test]
    fn test_parse_round_trips_with_display() {
        let rows = [
            "AA..B.",
            "..C.B.",
            "RRC...",
            "..C..D",
            ".....D",
            "EEE..D",
        ];
        let board = board_from_str_array(&rows).unwrap();
        assert_eq!(board.to_string(), rows.join("\n"));
    }

    #[test]
    fn test_parse_short_rows_are_padded() {
        let board = board_from_str_array(&["AA", "", "RR"]).unwrap();
        assert_eq!(board.blocks().len(), 2);
        assert!(board.goal().is_some());
    }

    #[test]
    fn test_parse_invalid_char() {
        let result = board_from_str_array(&["Rx...."]);
        assert!(result.unwrap_err().contains("Unrecognized character 'x'"));
    }

    #[test]
    fn test_parse_too_many_rows() {
        let rows = vec!["......"; GRID_SIZE + 1];
        let result = board_from_str_array(&rows);
        assert!(result.unwrap_err().contains("Invalid number of rows"));
    }

    #[test]
    fn test_parse_row_too_long() {
        let result = board_from_str_array(&["AA....."]);
        assert!(result.unwrap_err().contains("Row 0 is too long"));
    }

    #[test]
    fn test_parse_single_cell_block() {
        let result = board_from_str_array(&["A....."]);
        assert!(result.unwrap_err().contains("covers 1 cells"));
    }

    #[test]
    fn test_parse_bent_block() {
        let result = board_from_str_array(&["AA....", "A....."]);
        assert!(result
            .unwrap_err()
            .contains("does not form a straight line"));
    }

    #[test]
    fn test_parse_gap_in_block() {
        let result = board_from_str_array(&["A.A..."]);
        assert!(result.unwrap_err().contains("not contiguous"));
    }
}
