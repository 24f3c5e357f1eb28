use uuid::Uuid;

use crate::models::{Card, ContactCard, ContactKind, JobOffer};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnId {
    Offers,
    Applied,
    Recruiter,
    HiringManager,
}

pub const COLUMN_ORDER: [ColumnId; 4] = [
    ColumnId::Offers,
    ColumnId::Applied,
    ColumnId::Recruiter,
    ColumnId::HiringManager,
];

impl ColumnId {
    pub fn title(&self) -> &'static str {
        match self {
            ColumnId::Offers => "Offers",
            ColumnId::Applied => "Applied",
            ColumnId::Recruiter => "Recruiter",
            ColumnId::HiringManager => "Hiring Manager",
        }
    }

    /// Applied, Recruiter, and Hiring Manager are sinks: cards placed there
    /// can never be dragged back out.
    pub fn is_locked(&self) -> bool {
        !matches!(self, ColumnId::Offers)
    }

    fn index(&self) -> usize {
        match self {
            ColumnId::Offers => 0,
            ColumnId::Applied => 1,
            ColumnId::Recruiter => 2,
            ColumnId::HiringManager => 3,
        }
    }
}

#[derive(Debug)]
pub struct Column {
    pub id: ColumnId,
    pub cards: Vec<Card>,
}

/// What a move produced, so the caller can trigger side effects (document
/// generation, notifications) without the board knowing about them.
#[derive(Debug)]
pub enum MoveOutcome {
    /// Locked source column or an out-of-range index; nothing changed.
    Rejected,
    /// Source and destination were the same column; nothing changed.
    Unchanged,
    /// Plain relocation with no side effects.
    Moved,
    /// An offer entered Applied: contact cards were fanned out and the
    /// caller should start document generation for the offer.
    Applied {
        offer: JobOffer,
        recruiters: usize,
        hiring_managers: usize,
    },
}

#[derive(Debug)]
pub struct Board {
    columns: [Column; 4],
}

impl Board {
    pub fn new() -> Self {
        Self {
            columns: COLUMN_ORDER.map(|id| Column { id, cards: Vec::new() }),
        }
    }

    pub fn column(&self, id: ColumnId) -> &Column {
        &self.columns[id.index()]
    }

    fn column_mut(&mut self, id: ColumnId) -> &mut Column {
        &mut self.columns[id.index()]
    }

    /// Append an offer to the Offers column (initial placement and feed
    /// injections both land here).
    pub fn add_offer(&mut self, offer: JobOffer) {
        self.column_mut(ColumnId::Offers).cards.push(Card::Offer(offer));
    }

    pub fn find_offer(&self, id: Uuid) -> Option<&JobOffer> {
        self.columns.iter().find_map(|col| {
            col.cards.iter().find_map(|card| match card {
                Card::Offer(offer) if offer.id == id => Some(offer),
                _ => None,
            })
        })
    }

    /// Apply a drag-and-drop move. Splice semantics: the card is removed at
    /// `source_index`, then inserted at `dest_index` in the destination.
    ///
    /// Moves out of a locked column, same-column moves, and out-of-range
    /// indices all leave the board untouched. When an offer lands in
    /// Applied, one contact card per recruiter is appended to the Recruiter
    /// column and one per hiring manager to the Hiring Manager column, each
    /// with a fresh id and a back-reference to the offer.
    pub fn move_card(
        &mut self,
        source: ColumnId,
        source_index: usize,
        dest: ColumnId,
        dest_index: usize,
    ) -> MoveOutcome {
        if source.is_locked() {
            return MoveOutcome::Rejected;
        }
        if source == dest {
            return MoveOutcome::Unchanged;
        }
        if source_index >= self.column(source).cards.len() {
            return MoveOutcome::Rejected;
        }
        if dest_index > self.column(dest).cards.len() {
            return MoveOutcome::Rejected;
        }

        let card = self.column_mut(source).cards.remove(source_index);
        let moved_offer = match &card {
            Card::Offer(offer) if dest == ColumnId::Applied => Some(offer.clone()),
            _ => None,
        };
        self.column_mut(dest).cards.insert(dest_index, card);

        let Some(offer) = moved_offer else {
            return MoveOutcome::Moved;
        };

        let recruiters = self.fan_out(&offer, ContactKind::Recruiter);
        let hiring_managers = self.fan_out(&offer, ContactKind::HiringManager);

        MoveOutcome::Applied {
            offer,
            recruiters,
            hiring_managers,
        }
    }

    fn fan_out(&mut self, offer: &JobOffer, kind: ContactKind) -> usize {
        let (contacts, target) = match kind {
            ContactKind::Recruiter => (&offer.recruiters, ColumnId::Recruiter),
            ContactKind::HiringManager => (&offer.hiring_managers, ColumnId::HiringManager),
        };
        let cards: Vec<Card> = contacts
            .iter()
            .map(|contact| Card::Contact(ContactCard::from_contact(offer, contact, kind)))
            .collect();
        let count = cards.len();
        self.column_mut(target).cards.extend(cards);
        count
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Contact;
    use chrono::NaiveDate;

    fn contact(name: &str, email: &str) -> Contact {
        Contact {
            name: name.to_string(),
            email: email.to_string(),
            linkedin_url: None,
            avatar: None,
        }
    }

    fn offer(position: &str, recruiters: usize, hiring_managers: usize) -> JobOffer {
        JobOffer {
            id: Uuid::new_v4(),
            company: "ACME".to_string(),
            company_logo: None,
            position: position.to_string(),
            description: "Build APIs. Own services.".to_string(),
            posted_date: NaiveDate::from_ymd_opt(2024, 11, 1).unwrap(),
            recruiters: (0..recruiters)
                .map(|i| contact(&format!("R{}", i), &format!("r{}@acme.com", i)))
                .collect(),
            hiring_managers: (0..hiring_managers)
                .map(|i| contact(&format!("H{}", i), &format!("h{}@acme.com", i)))
                .collect(),
            company_info: None,
        }
    }

    fn lengths(board: &Board) -> [usize; 4] {
        COLUMN_ORDER.map(|id| board.column(id).cards.len())
    }

    #[test]
    fn test_apply_fans_out_contact_cards() {
        let mut board = Board::new();
        let moved = offer("Backend Engineer", 2, 3);
        let moved_id = moved.id;
        board.add_offer(moved);

        let outcome = board.move_card(ColumnId::Offers, 0, ColumnId::Applied, 0);
        match outcome {
            MoveOutcome::Applied {
                offer,
                recruiters,
                hiring_managers,
            } => {
                assert_eq!(offer.id, moved_id);
                assert_eq!(recruiters, 2);
                assert_eq!(hiring_managers, 3);
            }
            other => panic!("expected Applied, got {:?}", other),
        }

        assert_eq!(lengths(&board), [0, 1, 2, 3]);

        for card in &board.column(ColumnId::Recruiter).cards {
            let Card::Contact(card) = card else {
                panic!("expected contact card");
            };
            assert_eq!(card.kind, ContactKind::Recruiter);
            assert_eq!(card.original_offer_id, moved_id);
            assert_ne!(card.id, moved_id);
        }
        for card in &board.column(ColumnId::HiringManager).cards {
            let Card::Contact(card) = card else {
                panic!("expected contact card");
            };
            assert_eq!(card.kind, ContactKind::HiringManager);
            assert_eq!(card.original_offer_id, moved_id);
        }
    }

    #[test]
    fn test_contact_card_ids_are_unique() {
        let mut board = Board::new();
        board.add_offer(offer("Backend Engineer", 3, 2));
        board.move_card(ColumnId::Offers, 0, ColumnId::Applied, 0);

        let mut ids: Vec<Uuid> = board
            .column(ColumnId::Recruiter)
            .cards
            .iter()
            .chain(&board.column(ColumnId::HiringManager).cards)
            .map(|c| c.id())
            .collect();
        ids.sort();
        ids.dedup();
        assert_eq!(ids.len(), 5);
    }

    #[test]
    fn test_locked_sources_reject_moves() {
        let mut board = Board::new();
        board.add_offer(offer("Backend Engineer", 1, 1));
        board.move_card(ColumnId::Offers, 0, ColumnId::Applied, 0);
        let before = lengths(&board);

        for source in [ColumnId::Applied, ColumnId::Recruiter, ColumnId::HiringManager] {
            let outcome = board.move_card(source, 0, ColumnId::Offers, 0);
            assert!(matches!(outcome, MoveOutcome::Rejected));
            assert_eq!(lengths(&board), before);
        }
    }

    #[test]
    fn test_same_column_move_is_a_noop() {
        let mut board = Board::new();
        board.add_offer(offer("First", 0, 0));
        board.add_offer(offer("Second", 0, 0));
        let order_before: Vec<Uuid> = board
            .column(ColumnId::Offers)
            .cards
            .iter()
            .map(|c| c.id())
            .collect();

        let outcome = board.move_card(ColumnId::Offers, 0, ColumnId::Offers, 1);
        assert!(matches!(outcome, MoveOutcome::Unchanged));

        let order_after: Vec<Uuid> = board
            .column(ColumnId::Offers)
            .cards
            .iter()
            .map(|c| c.id())
            .collect();
        assert_eq!(order_before, order_after);
    }

    #[test]
    fn test_out_of_range_indices_are_rejected() {
        let mut board = Board::new();
        board.add_offer(offer("Backend Engineer", 1, 1));

        assert!(matches!(
            board.move_card(ColumnId::Offers, 5, ColumnId::Applied, 0),
            MoveOutcome::Rejected
        ));
        assert!(matches!(
            board.move_card(ColumnId::Offers, 0, ColumnId::Applied, 1),
            MoveOutcome::Rejected
        ));
        assert_eq!(lengths(&board), [1, 0, 0, 0]);
    }

    #[test]
    fn test_splice_insertion_respects_dest_index() {
        let mut board = Board::new();
        let first = offer("First", 0, 0);
        let second = offer("Second", 0, 0);
        let second_id = second.id;
        board.add_offer(first);
        board.add_offer(second);

        board.move_card(ColumnId::Offers, 0, ColumnId::Applied, 0);
        // Insert ahead of the existing applied card.
        let outcome = board.move_card(ColumnId::Offers, 0, ColumnId::Applied, 0);
        assert!(matches!(outcome, MoveOutcome::Applied { .. }));

        assert_eq!(board.column(ColumnId::Applied).cards[0].id(), second_id);
    }

    #[test]
    fn test_move_to_non_applied_has_no_side_effects() {
        let mut board = Board::new();
        board.add_offer(offer("Backend Engineer", 2, 2));

        let outcome = board.move_card(ColumnId::Offers, 0, ColumnId::Recruiter, 0);
        assert!(matches!(outcome, MoveOutcome::Moved));
        assert_eq!(lengths(&board), [0, 0, 1, 0]);
    }

    #[test]
    fn test_offer_with_no_contacts_fans_out_nothing() {
        let mut board = Board::new();
        board.add_offer(offer("Backend Engineer", 0, 0));

        let outcome = board.move_card(ColumnId::Offers, 0, ColumnId::Applied, 0);
        match outcome {
            MoveOutcome::Applied {
                recruiters,
                hiring_managers,
                ..
            } => {
                assert_eq!(recruiters, 0);
                assert_eq!(hiring_managers, 0);
            }
            other => panic!("expected Applied, got {:?}", other),
        }
        assert_eq!(lengths(&board), [0, 1, 0, 0]);
    }
}
