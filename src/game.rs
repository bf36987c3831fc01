use crate::answer::{self, Verdict};
use crate::config::GameConfig;
use crate::masker::LetterPuzzle;
use crate::puzzle::Puzzle;
use crate::timer::{Timer, TimerDriver};
use crate::word_bank::WordBank;
use crate::{Error, Result};
use rand::rngs::StdRng;
use serde::Serialize;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use tokio::sync::Notify;
use tracing::{debug, info, warn};

/// Score the player spends on revealing letters
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Wallet {
    balance: u32,
    reveal_cost: u32,
}

impl Wallet {
    pub fn new(config: &GameConfig) -> Self {
        Wallet {
            balance: config.starting_score,
            reveal_cost: config.reveal_cost,
        }
    }

    pub fn balance(&self) -> u32 {
        self.balance
    }

    pub fn reveal_cost(&self) -> u32 {
        self.reveal_cost
    }

    pub fn can_afford_reveal(&self) -> bool {
        self.balance >= self.reveal_cost
    }
}

/// State of one game screen: the word list, the current puzzle, its timer
/// and the verdict on the player's answer.
///
/// A new puzzle replaces the previous round wholesale.
pub struct Session<P: Puzzle> {
    bank: WordBank,
    config: GameConfig,
    rng: StdRng,
    puzzle: Option<P>,
    verdict: Verdict,
    wallet: Wallet,
    timer: TimerDriver,
    timed_out: Arc<AtomicBool>,
    timeout_notify: Arc<Notify>,
}

impl<P: Puzzle> Session<P> {
    pub fn new(bank: WordBank, config: GameConfig, rng: StdRng) -> Result<Self> {
        let expected = P::KIND.word_length();
        if bank.word_length() != expected {
            return Err(Error::Game(format!(
                "{} needs {}-letter words, word list has {}",
                P::KIND,
                expected,
                bank.word_length()
            )));
        }

        let timed_out = Arc::new(AtomicBool::new(false));
        let timeout_notify = Arc::new(Notify::new());

        // idle until the first puzzle
        let mut timer = Timer::new(config.timeout());
        timer.pause();
        {
            let timed_out = Arc::clone(&timed_out);
            let notify = Arc::clone(&timeout_notify);
            timer.on_timeout(move || {
                timed_out.store(true, Ordering::SeqCst);
                notify.notify_one();
            });
        }

        Ok(Session {
            bank,
            wallet: Wallet::new(&config),
            config,
            rng,
            puzzle: None,
            verdict: Verdict::Unknown,
            timer: TimerDriver::new(timer),
            timed_out,
            timeout_notify,
        })
    }

    /// Start a new round. Returns `false` and leaves the current round alone
    /// when the word list is empty.
    pub async fn new_puzzle(&mut self) -> Result<bool> {
        let Some(word) = self.bank.random_word(&mut self.rng) else {
            debug!(game = %P::KIND, "no words loaded, keeping current puzzle");
            return Ok(false);
        };
        let word = word.to_string();
        let puzzle = P::generate(&word, &self.config, &mut self.rng)?;

        self.puzzle = Some(puzzle);
        self.verdict = Verdict::Unknown;
        self.wallet = Wallet::new(&self.config);
        self.timer.reset(self.config.timeout()).await;
        self.timer.resume().await;
        self.timed_out.store(false, Ordering::SeqCst);

        debug!(game = %P::KIND, "new round started");
        Ok(true)
    }

    /// Judge an answer. The first judged answer ends the round and freezes
    /// the timer; later submissions return that verdict.
    pub async fn submit(&mut self, answer: Option<&str>) -> Verdict {
        if self.is_round_over() {
            return self.verdict();
        }
        let Some(puzzle) = &self.puzzle else {
            return Verdict::Unknown;
        };

        let verdict = answer::check(answer, puzzle.word());
        if verdict.is_judged() {
            self.verdict = verdict;
            self.timer.pause().await;
            info!(game = %P::KIND, ?verdict, "answer judged");
        }
        verdict
    }

    /// Verdict of the round; running out of time counts as incorrect
    pub fn verdict(&self) -> Verdict {
        if self.verdict == Verdict::Unknown && self.timed_out.load(Ordering::SeqCst) {
            Verdict::Incorrect
        } else {
            self.verdict
        }
    }

    pub fn is_round_over(&self) -> bool {
        self.verdict().is_judged()
    }

    pub fn has_timed_out(&self) -> bool {
        self.timed_out.load(Ordering::SeqCst)
    }

    pub async fn pause(&mut self) {
        if self.puzzle.is_some() && !self.is_round_over() {
            self.timer.pause().await;
        }
    }

    pub async fn resume(&mut self) {
        if self.puzzle.is_some() && !self.is_round_over() {
            self.timer.resume().await;
        }
    }

    pub async fn timer_display(&self) -> String {
        self.timer.display().await
    }

    /// Notified when the countdown of the current round runs out
    pub fn timeout_notifier(&self) -> Arc<Notify> {
        Arc::clone(&self.timeout_notify)
    }

    pub fn puzzle(&self) -> Option<&P> {
        self.puzzle.as_ref()
    }

    pub fn wallet(&self) -> Wallet {
        self.wallet
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn bank(&self) -> &WordBank {
        &self.bank
    }
}

impl Session<LetterPuzzle> {
    /// Buy the hidden letter at answer position `index`
    pub fn reveal(&mut self, index: usize) -> Result<char> {
        if self.is_round_over() {
            return Err(Error::Game("the round is over".into()));
        }
        let puzzle = self
            .puzzle
            .as_mut()
            .ok_or_else(|| Error::Game("no puzzle yet".into()))?;
        if !self.wallet.can_afford_reveal() {
            warn!(
                balance = self.wallet.balance,
                cost = self.wallet.reveal_cost,
                "not enough score to reveal"
            );
            return Err(Error::Game(format!(
                "revealing costs {}, only {} left",
                self.wallet.reveal_cost, self.wallet.balance
            )));
        }

        let letter = puzzle.reveal(index)?.letter;
        self.wallet.balance -= self.wallet.reveal_cost;
        debug!(index, balance = self.wallet.balance, "letter revealed");
        Ok(letter)
    }

    pub fn score(&self) -> u32 {
        self.wallet.balance
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::puzzle::GameKind;
    use crate::{PiePuzzle, RingPuzzle};
    use rand::SeedableRng;
    use std::time::Duration;

    fn bank(kind: GameKind, words: &[&str]) -> WordBank {
        WordBank::new(
            kind.word_length(),
            words.iter().map(|w| w.to_string()).collect(),
        )
        .unwrap()
    }

    fn rng() -> StdRng {
        StdRng::seed_from_u64(2024)
    }

    #[test]
    fn test_rejects_bank_of_other_game() {
        let result = Session::<RingPuzzle>::new(
            bank(GameKind::Taartpunt, &["aardbeien"]),
            GameConfig::for_game(GameKind::Paardensprong),
            rng(),
        );
        assert!(matches!(result, Err(Error::Game(_))));
    }

    #[tokio::test(start_paused = true)]
    async fn test_empty_bank_is_a_no_op() {
        let mut session = Session::<PiePuzzle>::new(
            bank(GameKind::Taartpunt, &[]),
            GameConfig::for_game(GameKind::Taartpunt),
            rng(),
        )
        .unwrap();
        assert!(!session.new_puzzle().await.unwrap());
        assert!(session.puzzle().is_none());
        assert_eq!(session.submit(Some("aardbeien")).await, Verdict::Unknown);
    }

    #[tokio::test(start_paused = true)]
    async fn test_correct_answer_freezes_timer() {
        let mut session = Session::<PiePuzzle>::new(
            bank(GameKind::Taartpunt, &["aardbeien"]),
            GameConfig::for_game(GameKind::Taartpunt),
            rng(),
        )
        .unwrap();
        assert!(session.new_puzzle().await.unwrap());
        assert_eq!(session.puzzle().unwrap().word(), "aardbeien");

        assert_eq!(session.submit(None).await, Verdict::Unknown);

        tokio::time::sleep(Duration::from_millis(2500)).await;
        assert_eq!(session.submit(Some(" AardBeien ")).await, Verdict::Correct);
        assert_eq!(session.timer_display().await, "0:02");

        tokio::time::sleep(Duration::from_secs(10)).await;
        assert_eq!(session.timer_display().await, "0:02");
        assert_eq!(session.submit(Some("fout")).await, Verdict::Correct);
    }

    #[tokio::test(start_paused = true)]
    async fn test_timeout_fails_the_round() {
        let mut config = GameConfig::for_game(GameKind::Paardensprong);
        config.timeout_seconds = Some(3);
        let mut session =
            Session::<RingPuzzle>::new(bank(GameKind::Paardensprong, &["computer"]), config, rng())
                .unwrap();
        let notify = session.timeout_notifier();
        session.new_puzzle().await.unwrap();
        assert_eq!(session.timer_display().await, "0:03");

        tokio::time::sleep(Duration::from_millis(3500)).await;
        assert!(session.has_timed_out());
        assert_eq!(session.verdict(), Verdict::Incorrect);
        tokio::time::timeout(Duration::from_millis(1), notify.notified())
            .await
            .expect("timeout notification");

        assert_eq!(session.submit(Some("computer")).await, Verdict::Incorrect);

        session.new_puzzle().await.unwrap();
        assert_eq!(session.verdict(), Verdict::Unknown);
        assert!(!session.has_timed_out());
        assert_eq!(session.timer_display().await, "0:03");
    }

    #[tokio::test(start_paused = true)]
    async fn test_resume_while_running_still_times_out() {
        let mut config = GameConfig::for_game(GameKind::Paardensprong);
        config.timeout_seconds = Some(3);
        let mut session =
            Session::<RingPuzzle>::new(bank(GameKind::Paardensprong, &["computer"]), config, rng())
                .unwrap();
        session.new_puzzle().await.unwrap();

        for _ in 0..20 {
            tokio::time::sleep(Duration::from_millis(900)).await;
            session.resume().await;
        }
        assert!(session.has_timed_out());
        assert_eq!(session.timer_display().await, "0:00");
        assert_eq!(session.verdict(), Verdict::Incorrect);
    }

    #[tokio::test(start_paused = true)]
    async fn test_pause_and_resume() {
        let mut session = Session::<PiePuzzle>::new(
            bank(GameKind::Taartpunt, &["olifanten"]),
            GameConfig::for_game(GameKind::Taartpunt),
            rng(),
        )
        .unwrap();
        session.new_puzzle().await.unwrap();
        tokio::time::sleep(Duration::from_millis(1500)).await;
        session.pause().await;
        tokio::time::sleep(Duration::from_secs(30)).await;
        assert_eq!(session.timer_display().await, "0:01");
        session.resume().await;
        tokio::time::sleep(Duration::from_millis(1500)).await;
        assert_eq!(session.timer_display().await, "0:02");
    }

    #[tokio::test(start_paused = true)]
    async fn test_reveal_spends_score() {
        let mut config = GameConfig::for_game(GameKind::TwaalfLetterWoord);
        config.known_letters = 0;
        config.starting_score = 20;
        config.reveal_cost = 10;
        let mut session = Session::<LetterPuzzle>::new(
            bank(GameKind::TwaalfLetterWoord, &["kinderwagens"]),
            config,
            rng(),
        )
        .unwrap();
        assert!(session.reveal(0).is_err());

        session.new_puzzle().await.unwrap();
        assert_eq!(session.score(), 20);

        assert_eq!(session.reveal(0).unwrap(), 'k');
        assert_eq!(session.score(), 10);

        // already revealed: no charge
        assert!(matches!(session.reveal(0), Err(Error::Puzzle(_))));
        assert_eq!(session.score(), 10);

        assert_eq!(session.reveal(11).unwrap(), 's');
        assert_eq!(session.score(), 0);

        assert!(matches!(session.reveal(5), Err(Error::Game(_))));
        assert!(session.puzzle().unwrap().tiles()[5].hidden);

        assert_eq!(session.submit(Some("Kinderwagens")).await, Verdict::Correct);
        assert!(matches!(session.reveal(6), Err(Error::Game(_))));

        session.new_puzzle().await.unwrap();
        assert_eq!(session.score(), 20);
    }
}
